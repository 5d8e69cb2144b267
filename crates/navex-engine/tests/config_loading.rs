//! Engine configuration files and their effect on a runtime

mod common;

use common::{calc, registry, Calls};
use navex_engine::{
    CompilationContext, ConfigError, EngineConfig, EvalContext, ExprTree, Runtime, SampleFailure,
};
use tempfile::TempDir;

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("navex.toml");
    std::fs::write(
        &path,
        r#"
[sampling]
read = "advisory"
skip_when_declared = true

[pool]
max_retained_per_length = 2
"#,
    )
    .unwrap();

    let config = EngineConfig::load(&path).unwrap();

    assert_eq!(config.sampling.read, SampleFailure::Advisory);
    assert_eq!(config.sampling.write, SampleFailure::Advisory);
    assert!(config.sampling.skip_when_declared);
    assert_eq!(config.pool.max_retained_per_length, 2);
}

#[test]
fn test_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("navex.toml");
    let mut config = EngineConfig::default();
    config.sampling.write = SampleFailure::Fatal;

    config.save(&path).unwrap();

    assert_eq!(EngineConfig::load(&path).unwrap(), config);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();

    let err = EngineConfig::load(&dir.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_loaded_config_drives_sampling() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("navex.toml");
    std::fs::write(&path, "[sampling]\nread = \"advisory\"\n").unwrap();
    let config = EngineConfig::load(&path).unwrap();

    let calls = Calls::default();
    let runtime = Runtime::with_config(registry(&calls), config);
    let root = calc();
    let mut tree = ExprTree::new();
    let one = tree.constant(1);
    let zero = tree.constant(0);
    let call = tree.method("divide", [one, zero]);

    let eval = EvalContext::new(&runtime, root.clone());
    let mut ctx = CompilationContext::new(&eval);
    let fragment = tree.node(call).compile_read(&mut ctx, &root).unwrap();

    assert_eq!(fragment.code, ".divide(1, 0)");
}
