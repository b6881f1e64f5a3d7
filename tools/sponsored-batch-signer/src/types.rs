use alloy_primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};
use sponsored_batch_core::{Authorization, Call, Fee};

/// One call of the batch as written in a request file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSpec {
    pub target: Address,
    #[serde(default)]
    pub value: U256,
    /// Calldata, `0x`-prefixed hex.
    #[serde(default)]
    pub data: Bytes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeSpec {
    /// Token address, or the zero address for the native asset.
    pub asset: Address,
    pub amount: U256,
    pub receiver: Address,
}

/// Authorization the account is asked to sign.
///
/// Numbers are `0x`-prefixed hex strings, as produced by JSON-RPC.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    /// Current on-chain nonce of the account (`nonce()` on the delegate).
    pub nonce: U256,
    /// Unix timestamp after which the sponsor can no longer submit.
    pub deadline: U256,
    pub calls: Vec<CallSpec>,
    /// Omitted for the no-fee entry point.
    #[serde(default)]
    pub fee: Option<FeeSpec>,
}

impl SignRequest {
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .iter()
            .map(|call| Call::new(call.target, call.value, call.data.clone()))
            .collect()
    }

    pub fn fee(&self) -> Fee {
        self.fee
            .map(|fee| Fee {
                asset: fee.asset,
                amount: fee.amount,
                receiver: fee.receiver,
            })
            .unwrap_or(Fee::NONE)
    }

    /// Engine view of the request, carrying `signature`.
    pub fn authorization(&self, signature: Bytes) -> Authorization {
        Authorization {
            calls: self.calls(),
            fee: self.fee(),
            deadline: self.deadline,
            signature,
        }
    }
}

/// Output handed to the sponsor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedAuthorization {
    pub account: Address,
    pub nonce: U256,
    pub deadline: U256,
    pub fee: Option<FeeSpec>,
    pub calls_fingerprint: B256,
    /// Digest before the `\x19Ethereum Signed Message:\n32` prefix.
    pub digest: B256,
    /// `r || s || v` with `v` in {27, 28}.
    pub signature: Bytes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestReport {
    pub calls_fingerprint: B256,
    pub digest: B256,
    /// Prefixed hash the key actually signs.
    pub signing_hash: B256,
}
