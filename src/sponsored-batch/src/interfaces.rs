//! Events observed by the off-chain tooling.

use stylus_sdk::alloy_sol_types::sol;

sol! {
    /// One per executed call, in batch order.
    event CallExecuted(address indexed target, uint256 value, bytes data);

    /// Once per committed batch. `nonce` is the value the authorization was signed over.
    event BatchExecuted(uint256 indexed nonce, uint256 callCount, bytes32 callsHash);

    /// Emitted when a non-zero fee was settled. `asset == address(0)` is the native asset.
    event FeeCharged(address indexed asset, address indexed receiver, uint256 amount);
}
