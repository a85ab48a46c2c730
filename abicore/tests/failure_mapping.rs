use abicore::{
    define_failures,
    executor::RawFailure,
    failure::{FailureSet, StandardFailure, resolve},
    function::Selector,
    records::Position,
};
use abitype::{
    AbiValue,
    types::{Schema, primary::PrimaryType},
    value::{Address, B256, Bytes, U256, Value},
};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

define_failures! {
    /// Failures of the lending pool.
    pub enum PoolFailure {
        InsufficientBalance { account: Address, available: U256, required: U256 },
        HealthFactorTooLow { account: Address, health: U256 },
        MarketFrozen { market: String },
        StalePosition { position: Position, reported_at: U256 },
        InvalidRoute { route: Bytes, hops: Vec<Address> },
        OracleMismatch { feed: B256, paused: bool },
        Paused {},
    }
}

fn sample(schema: &Schema, rng: &mut impl Rng) -> Value {
    match schema {
        Schema::Primary(PrimaryType::Address) => {
            let mut bytes = [0u8; 20];
            rng.fill_bytes(&mut bytes);
            Value::Address(Address(bytes))
        }
        Schema::Primary(PrimaryType::Uint256) => Value::uint(rng.next_u64()),
        Schema::Primary(PrimaryType::Bool) => Value::Bool(rng.random_bool(0.5)),
        Schema::Primary(PrimaryType::Bytes32) => {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            Value::Bytes32(B256(bytes))
        }
        Schema::Primary(PrimaryType::Bytes) => {
            let mut bytes = vec![0u8; rng.random_range(0..40)];
            rng.fill_bytes(&mut bytes);
            Value::Bytes(bytes)
        }
        Schema::Primary(PrimaryType::String) => Value::String("x".repeat(rng.random_range(0..40))),
        Schema::Tuple(tuple) => {
            Value::Tuple(tuple.elements.iter().map(|s| sample(s, rng)).collect())
        }
        Schema::Array(array) => {
            let values = (0..rng.random_range(0..3))
                .map(|_| sample(&array.element, rng))
                .collect();
            Value::array((*array.element).clone(), values).unwrap()
        }
    }
}

#[test]
fn every_registered_case_has_a_named_arm() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let registry = PoolFailure::registry();
    assert_eq!(registry.len(), 7);

    for descriptor in registry.descriptors() {
        for _ in 0..10 {
            let value = sample(&descriptor.input_schema(), &mut rng);
            let args = match &value {
                Value::Tuple(args) => args.clone(),
                _ => unreachable!(),
            };

            let direct = PoolFailure::from_decoded(descriptor, value);
            assert!(!direct.is_unknown_revert(), "`{descriptor}` fell back");

            let raw = RawFailure::from_payload(&descriptor.encode_call(&args).unwrap()).unwrap();
            assert_eq!(PoolFailure::resolve(&raw).unwrap(), direct);
        }
    }
}

#[test]
fn foreign_shape_maps_to_unknown_revert() {
    let registry = PoolFailure::registry();
    let foreign = Value::Tuple(vec![Value::Bool(true)]);

    for descriptor in registry.descriptors() {
        let resolved = PoolFailure::from_decoded(descriptor, foreign.clone());
        assert_eq!(
            resolved,
            PoolFailure::UnknownRevert {
                name: descriptor.name().to_string(),
                value: foreign.to_string(),
            }
        );
    }
}

#[test]
fn nested_record_arm() {
    let position = Position {
        market: "WBTC".into(),
        asset: Address([0xb7; 20]),
        supplied: U256::from(2u8),
        borrowed: U256::ZERO,
        is_collateral: true,
    };
    let stale = PoolFailure::registry().by_name("StalePosition").unwrap();
    assert_eq!(
        stale.signature(),
        "StalePosition((string,address,uint256,uint256,bool),uint256)"
    );

    let payload = stale
        .encode_call(&[position.to_value(), Value::uint(1_700_000_000u64)])
        .unwrap();
    let raw = RawFailure::from_payload(&payload).unwrap();

    assert_eq!(
        resolve::<PoolFailure>(&raw).unwrap(),
        PoolFailure::StalePosition {
            position,
            reported_at: U256::from(1_700_000_000u64),
        }
    );
}

#[test]
fn truncated_data_keeps_the_raw_bytes() {
    let frozen = PoolFailure::registry().by_name("MarketFrozen").unwrap();
    let mut payload = frozen.encode_call(&[Value::from("ETH")]).unwrap();
    payload.truncate(4 + 40);
    let raw = RawFailure::from_payload(&payload).unwrap();

    match PoolFailure::resolve(&raw).unwrap() {
        PoolFailure::UnknownRevert { name, value } => {
            assert_eq!(name, "MarketFrozen");
            assert_eq!(value, format!("0x{}", hex::encode(&payload[4..])));
        }
        other => panic!("unexpected arm {other:?}"),
    }
}

#[test]
fn failure_sets_are_independent() {
    let reason = StandardFailure::registry().by_name("Error").unwrap();
    let payload = reason.encode_call(&[Value::from("boom")]).unwrap();
    let raw = RawFailure::from_payload(&payload).unwrap();

    assert!(PoolFailure::resolve(&raw).is_err());
    assert_eq!(
        StandardFailure::resolve(&raw).unwrap(),
        StandardFailure::Error {
            message: "boom".into()
        }
    );
}

#[test]
fn selectors_are_unique_across_sets() {
    let mut selectors: Vec<Selector> = PoolFailure::registry()
        .descriptors()
        .iter()
        .chain(StandardFailure::registry().descriptors())
        .map(|d| d.selector())
        .collect();
    let total = selectors.len();
    selectors.sort();
    selectors.dedup();
    assert_eq!(selectors.len(), total);
}
