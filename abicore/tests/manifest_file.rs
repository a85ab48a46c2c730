use abicore::{
    config::{AbiManifest, ErrorEntry, FunctionEntry},
    executor::RawFailure,
    utils::error::AbiError,
};
use abitype::value::{Address, Value};

fn scratch_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("abicore-test-{}", std::process::id()))
        .join(name)
}

fn manifest() -> AbiManifest {
    AbiManifest {
        functions: vec![
            FunctionEntry {
                signature: "balanceOf(address)".into(),
                outputs: Some("(uint256)".into()),
            },
            FunctionEntry {
                signature: "transfer(address,uint256)".into(),
                outputs: Some("(bool)".into()),
            },
        ],
        errors: vec![ErrorEntry {
            signature: "Blacklisted(address)".into(),
        }],
        ..Default::default()
    }
}

#[test]
fn save_then_load() {
    let path = scratch_path("nested/manifest.toml");
    manifest().save_to_toml(&path).unwrap();

    let loaded = AbiManifest::load_from_toml(&path).unwrap();
    assert_eq!(loaded, manifest());
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file_is_an_io_error() {
    let path = scratch_path("does-not-exist.toml");
    assert!(matches!(
        AbiManifest::load_from_toml(&path),
        Err(AbiError::Io(_))
    ));
}

#[test]
fn manifest_registry_decodes_failures() {
    let registry = manifest().build_error_registry().unwrap();
    let blacklisted = registry.by_name("Blacklisted").unwrap();
    let payload = blacklisted
        .encode_call(&[Value::Address(Address([0x66; 20]))])
        .unwrap();

    let decoded = registry
        .decode_failure(&RawFailure::from_payload(&payload).unwrap())
        .unwrap();
    assert_eq!(decoded.descriptor.name(), "Blacklisted");
}

#[test]
fn colliding_entries_are_rejected() {
    let mut manifest = manifest();
    manifest.functions.push(FunctionEntry {
        signature: "balanceOf(address)".into(),
        outputs: None,
    });
    assert!(matches!(
        manifest.build_interface(),
        Err(AbiError::SelectorCollision { .. })
    ));
}
