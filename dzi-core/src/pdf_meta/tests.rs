use super::*;

#[test]
fn extract_xmp_packet_returns_empty_when_absent() {
    assert_eq!(extract_xmp_packet(b"%PDF-1.4\n...no packet here..."), "");
}

#[test]
fn extract_xmp_packet_finds_the_wrapped_span() {
    let buf = b"junk before <?xpacket begin=\"\\xef\\xbb\\xbf\" id=\"W5M0\"?><x:xmpmeta>hi</x:xmpmeta><?xpacket end=\"w\"?> trailing junk";
    let packet = extract_xmp_packet(buf);
    assert!(packet.starts_with("<?xpacket begin"));
    assert!(packet.ends_with("<?xpacket end=\"w\"?>"));
    assert!(packet.contains("<x:xmpmeta>hi</x:xmpmeta>"));
}

#[test]
fn find_subslice_locates_needle() {
    assert_eq!(find_subslice(b"abcdef", b"cd"), Some(2));
    assert_eq!(find_subslice(b"abcdef", b"zz"), None);
}
