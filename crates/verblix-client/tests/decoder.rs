use verblix_client::decoder::FrameDecoder;
use verblix_core::models::frame::{ResponseKind, StreamFrame};

fn ai(text: &str) -> StreamFrame {
    StreamFrame::fragment(ResponseKind::Ai, text)
}

#[test]
fn decodes_complete_frames() {
    let mut decoder = FrameDecoder::new();
    let frames = decoder.push(
        b"event: message\ndata: {\"type\":\"ai\",\"text\":\"Hel\"}\n\nevent: end\ndata: {}\n\n",
    );
    assert_eq!(frames, vec![ai("Hel"), StreamFrame::End]);
}

#[test]
fn carries_partial_frames_across_chunks() {
    let wire = "event: message\ndata: {\"type\":\"ai\",\"text\":\"Hello\"}\n\nevent: message\ndata: {\"type\":\"ai\",\"text\":\" world\"}\n\nevent: end\ndata: {}\n\n";
    let bytes = wire.as_bytes();

    for split in 1..bytes.len() {
        let mut decoder = FrameDecoder::new();
        let mut frames = decoder.push(&bytes[..split]);
        frames.extend(decoder.push(&bytes[split..]));
        assert_eq!(
            frames,
            vec![ai("Hello"), ai(" world"), StreamFrame::End],
            "split at {split}"
        );
    }
}

#[test]
fn multibyte_characters_split_across_chunks() {
    let wire = "event: message\ndata: {\"type\":\"ai\",\"text\":\"héllo ✓ 🚀\"}\n\n";
    let bytes = wire.as_bytes();
    let rocket = wire.find('🚀').unwrap();

    let mut decoder = FrameDecoder::new();
    let mut frames = decoder.push(&bytes[..rocket + 2]);
    assert!(frames.is_empty());
    frames.extend(decoder.push(&bytes[rocket + 2..]));
    assert_eq!(frames, vec![ai("héllo ✓ 🚀")]);
}

#[test]
fn crlf_line_endings() {
    let mut decoder = FrameDecoder::new();
    let mut frames = decoder.push(b"event: message\r\ndata: {\"type\":\"ai\",\"text\":\"a\"}\r");
    frames.extend(decoder.push(b"\n\r\nevent: end\r\ndata: {}\r\n\r\n"));
    assert_eq!(frames, vec![ai("a"), StreamFrame::End]);
}

#[test]
fn malformed_units_are_discarded() {
    let mut decoder = FrameDecoder::new();
    let frames = decoder.push(
        b": keep-alive\n\nevent: message\ndata: not json\n\nevent: progress\ndata: {\"type\":\"ai\",\"text\":\"x\"}\n\nevent: message\ndata: {\"type\":\"ai\",\"text\":\"ok\"}\n\n",
    );
    assert_eq!(frames, vec![ai("ok")]);
}

#[test]
fn error_frames_are_typed() {
    let mut decoder = FrameDecoder::new();
    let frames = decoder.push(
        b"event: error\ndata: {\"type\":\"error\",\"text\":\"Stream generation failed: boom\"}\n\n",
    );
    assert_eq!(frames, vec![StreamFrame::error("Stream generation failed: boom")]);
}

#[test]
fn finish_flushes_an_unterminated_frame() {
    let mut decoder = FrameDecoder::new();
    assert!(
        decoder
            .push(b"event: message\ndata: {\"type\":\"joke\",\"text\":\"ha\"}")
            .is_empty()
    );
    assert_eq!(
        decoder.finish(),
        vec![StreamFrame::fragment(ResponseKind::Joke, "ha")]
    );
    assert!(decoder.finish().is_empty());
}
