use super::*;

#[test]
fn io_variant_carries_path() {
    let err = DziError::io(
        "/tmp/asset/page_1",
        std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    );
    match err {
        DziError::Io { path, .. } => assert_eq!(path, Some(PathBuf::from("/tmp/asset/page_1"))),
        _ => panic!("wrong variant"),
    }
}

#[test]
fn external_tool_message_is_rendered() {
    let err = DziError::tool("gs", "exit status 1");
    assert_eq!(err.to_string(), "external tool `gs` failed: exit status 1");
}

#[test]
fn plain_io_error_has_no_path() {
    let err: DziError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
    match err {
        DziError::Io { path, .. } => assert!(path.is_none()),
        _ => panic!("wrong variant"),
    }
}
