use abitype::{
    codec::{decode, decode_resolving, encode, encoded_size},
    types::{Schema, primary::PrimaryType},
    value::{Address, B256, U256, Value},
};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

const CHARSET: &[&str] = &["a", "Z", "0", " ", "é", "€", "ß", "𝄞", "\n"];

fn random_schema(depth: usize, rng: &mut impl Rng) -> Schema {
    let max = if depth == 0 { 5 } else { 7 };
    match rng.random_range(0..=max) {
        0 => Schema::ADDRESS,
        1 => Schema::UINT256,
        2 => Schema::BOOL,
        3 => Schema::BYTES32,
        4 => Schema::BYTES,
        5 => Schema::STRING,
        6 => {
            let arity = rng.random_range(1..=4);
            Schema::tuple((0..arity).map(|_| random_schema(depth - 1, rng)))
        }
        7 => Schema::array(random_schema(depth - 1, rng)),
        _ => unreachable!(),
    }
}

fn random_value(schema: &Schema, rng: &mut impl Rng) -> Value {
    match schema {
        Schema::Primary(PrimaryType::Address) => {
            let mut bytes = [0u8; 20];
            rng.fill_bytes(&mut bytes);
            Value::Address(Address(bytes))
        }
        Schema::Primary(PrimaryType::Uint256) => {
            let mut bytes = [0u8; 32];
            let len = rng.random_range(0..=32);
            rng.fill_bytes(&mut bytes[..len]);
            Value::Uint(U256::from_be_slice(&bytes[..len]).unwrap())
        }
        Schema::Primary(PrimaryType::Bool) => Value::Bool(rng.random_bool(0.5)),
        Schema::Primary(PrimaryType::Bytes32) => {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            Value::Bytes32(B256(bytes))
        }
        Schema::Primary(PrimaryType::Bytes) => {
            let mut bytes = vec![0u8; rng.random_range(0..70)];
            rng.fill_bytes(&mut bytes);
            Value::Bytes(bytes)
        }
        Schema::Primary(PrimaryType::String) => {
            let len = rng.random_range(0..24);
            Value::String(
                (0..len)
                    .map(|_| CHARSET[rng.random_range(0..CHARSET.len())])
                    .collect(),
            )
        }
        Schema::Tuple(tuple) => Value::Tuple(
            tuple
                .elements
                .iter()
                .map(|element| random_value(element, rng))
                .collect(),
        ),
        Schema::Array(array) => {
            let len = rng.random_range(0..4);
            let values = (0..len).map(|_| random_value(&array.element, rng)).collect();
            Value::array((*array.element).clone(), values).unwrap()
        }
    }
}

#[test]
fn random_values_round_trip() {
    let mut rng = ChaCha20Rng::seed_from_u64(0x5eed);

    for _ in 0..500 {
        let schema = random_schema(3, &mut rng);
        let value = random_value(&schema, &mut rng);
        assert_eq!(value.schema(), schema);

        let bytes = encode(&value);
        assert_eq!(bytes.len() % 32, 0, "encoding of `{schema}` is not word aligned");
        assert_eq!(bytes.len(), encoded_size(&value));
        assert_eq!(decode(&bytes, &schema).unwrap(), value, "schema `{schema}`");
    }
}

#[test]
fn random_values_decode_bare_and_wrapped() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xa11ce);

    for _ in 0..300 {
        let schema = random_schema(2, &mut rng);
        let value = random_value(&schema, &mut rng);

        let bare = encode(&value);
        assert_eq!(decode_resolving(&bare, &schema).unwrap(), value);

        let wrapped = encode(&Value::Tuple(vec![value.clone()]));
        match decode(&wrapped, &schema) {
            // Static values encode identically in both framings.
            Ok(same) if same == value => assert_eq!(wrapped, bare),
            // Otherwise the wrapped bytes only read bare when they are the
            // canonical encoding of the 32 NUL byte reading of an empty
            // string or byte string.
            Ok(other) => assert_eq!(
                Some(other),
                nul_word_reading(&value),
                "schema `{schema}`"
            ),
            Err(_) => assert_eq!(
                decode_resolving(&wrapped, &schema).unwrap(),
                value,
                "schema `{schema}`"
            ),
        }
    }
}

/// The value a bare decode finds in the wrapped encoding of `value`, when
/// `value` is an empty string or byte string nested in one-member tuples.
fn nul_word_reading(value: &Value) -> Option<Value> {
    match value {
        Value::String(text) if text.is_empty() => Some(Value::String("\0".repeat(32))),
        Value::Bytes(bytes) if bytes.is_empty() => Some(Value::Bytes(vec![0; 32])),
        Value::Tuple(members) if members.len() == 1 => {
            nul_word_reading(&members[0]).map(|member| Value::Tuple(vec![member]))
        }
        _ => None,
    }
}

#[test]
fn empty_dynamic_values_read_as_nul_words_when_wrapped() {
    for (value, reading) in [
        (Value::from(""), Value::String("\0".repeat(32))),
        (Value::Bytes(vec![]), Value::Bytes(vec![0; 32])),
        (
            Value::Tuple(vec![Value::from("")]),
            Value::Tuple(vec![Value::String("\0".repeat(32))]),
        ),
    ] {
        let wrapped = encode(&Value::Tuple(vec![value.clone()]));
        assert_eq!(wrapped.len() % 32, 0);
        assert_eq!(decode_resolving(&wrapped, &value.schema()).unwrap(), reading);
        assert_eq!(
            decode(&wrapped, &value.schema().wrapped()).unwrap(),
            Value::Tuple(vec![value])
        );
    }
}

#[test]
fn empty_and_boundary_values() {
    let values = [
        Value::Bytes(vec![]),
        Value::String(String::new()),
        Value::Bytes(vec![0xaa; 32]),
        Value::Bytes(vec![0xaa; 33]),
        Value::Uint(U256::max_value()),
        Value::Uint(U256::ZERO),
        Value::Tuple(vec![]),
        Value::array(Schema::STRING, vec![]).unwrap(),
    ];

    for value in values {
        let bytes = encode(&value);
        assert_eq!(decode(&bytes, &value.schema()).unwrap(), value, "value {value}");
    }
}
