use speechgate::infrastructure::audio::{AudioDecoderFactory, DecodeStrategy};

#[test]
fn given_strategy_names_when_parsing_then_maps_to_variants() {
    assert_eq!(
        DecodeStrategy::parse("in-process"),
        Some(DecodeStrategy::InProcess)
    );
    assert_eq!(
        DecodeStrategy::parse("InProcess"),
        Some(DecodeStrategy::InProcess)
    );
    assert_eq!(
        DecodeStrategy::parse("external"),
        Some(DecodeStrategy::External)
    );
    assert_eq!(DecodeStrategy::parse(" AUTO "), Some(DecodeStrategy::Auto));
    assert_eq!(DecodeStrategy::parse("soundfile"), None);
}

#[test]
fn given_in_process_strategy_when_creating_then_returns_decoder() {
    let result = AudioDecoderFactory::create(DecodeStrategy::InProcess);

    assert!(result.is_ok());
}

#[test]
fn given_auto_strategy_when_creating_then_returns_decoder_even_without_ffmpeg() {
    // The cascade degrades gracefully; only the external-only strategy
    // requires the binary at startup.
    let result = AudioDecoderFactory::create(DecodeStrategy::Auto);

    assert!(result.is_ok());
}
