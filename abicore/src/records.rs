//! Domain records exchanged with the lending and trading contracts.
//!
//! Records carry no logic: each one is a fixed list of typed fields whose
//! schema is the tuple of the field schemas.
use abitype::{
    abi_record,
    value::{Address, Bytes, U256},
};

abi_record! {
    /// Move `amount` of `asset` from the caller to `to`.
    pub struct TransferIntent {
        pub asset: Address,
        pub to: Address,
        pub amount: U256,
    }
}

abi_record! {
    /// Borrow `amount` of `asset` against `collateral_amount` of `collateral`.
    pub struct BorrowIntent {
        pub asset: Address,
        pub amount: U256,
        pub collateral: Address,
        pub collateral_amount: U256,
    }
}

abi_record! {
    /// Swap `amount_in` of `asset_in` for at least `min_amount_out` of
    /// `asset_out`, following the encoded `route`.
    pub struct SwapIntent {
        pub asset_in: Address,
        pub asset_out: Address,
        pub amount_in: U256,
        pub min_amount_out: U256,
        pub route: Bytes,
    }
}

abi_record! {
    pub struct Balance {
        pub account: Address,
        pub balance: U256,
    }
}

abi_record! {
    /// One open position on a market.
    pub struct Position {
        pub market: String,
        pub asset: Address,
        pub supplied: U256,
        pub borrowed: U256,
        pub is_collateral: bool,
    }
}

abi_record! {
    /// Every position of `owner` at block `block`.
    pub struct PositionSnapshot {
        pub owner: Address,
        pub block: U256,
        pub positions: Vec<Position>,
    }
}
