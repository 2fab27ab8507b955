#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::{rngs::StdRng, Rng, SeedableRng};
    use zstd_bridge::prelude::*;

    const CITIES: [&str; 6] = ["Lisbon", "Oslo", "Nairobi", "Quito", "Osaka", "Perth"];

    fn json_samples(count: usize, seed: u64) -> Vec<Vec<u8>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|i| {
                format!(
                    r#"{{"id":{i},"user":"user_{}","email":"user{}@example.com","active":{},"score":{},"tags":["alpha","beta"],"address":{{"city":"{}","zip":"{:05}"}}}}"#,
                    rng.gen_range(0..1000),
                    rng.gen_range(0..1000),
                    rng.gen_bool(0.5),
                    rng.gen_range(0..100),
                    CITIES[rng.gen_range(0..CITIES.len())],
                    rng.gen_range(0..99_999),
                )
                .into_bytes()
            })
            .collect()
    }

    /// Structurally unrelated corpus, so its dictionary gets a different id.
    fn log_samples(count: usize, seed: u64) -> Vec<Vec<u8>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|i| {
                format!(
                    "2024-03-{:02}T{:02}:{:02}:{:02}Z WARN worker-{} request {} took {}ms status={}\n",
                    rng.gen_range(1..29),
                    rng.gen_range(0..24),
                    rng.gen_range(0..60),
                    rng.gen_range(0..60),
                    rng.gen_range(0..16),
                    i,
                    rng.gen_range(1..5000),
                    [200, 404, 500][rng.gen_range(0..3)],
                )
                .into_bytes()
            })
            .collect()
    }

    fn compressor(dict: Option<&[u8]>) -> Compressor {
        let opts = CompressionOptions::new(dict, DEFAULT_COMPRESSION_LEVEL, None).unwrap();
        Compressor::with_options(Arc::new(opts)).unwrap()
    }

    fn decompressor(dict: Option<&[u8]>) -> Decompressor {
        let opts = DecompressionOptions::new(dict, None).unwrap();
        Decompressor::with_options(Arc::new(opts)).unwrap()
    }

    // # ✅ 1. Training
    #[test]
    fn test_trained_dictionary_respects_capacity() {
        let dict = train_dictionary(&json_samples(1000, 1), 2048).unwrap();
        assert!(!dict.is_empty());
        assert!(dict.len() <= 2048);
    }

    #[test]
    fn test_training_validates_arguments() {
        let samples = json_samples(10, 1);
        assert!(train_dictionary(&samples, 0).unwrap_err().is_argument());
        let empty: Vec<Vec<u8>> = Vec::new();
        assert!(train_dictionary(&empty, DEFAULT_DICT_CAPACITY).unwrap_err().is_argument());
    }

    // # ✅ 2. Dictionary improves ratio on small structured records
    #[test]
    fn test_dictionary_shrinks_small_records() {
        let dict = train_dictionary(&json_samples(1000, 1), 4096).unwrap();
        let mut plain = compressor(None);
        let mut with_dict = compressor(Some(&dict));

        let (mut total_plain, mut total_dict) = (0, 0);
        for record in json_samples(50, 99) {
            let a = plain.wrap(&record).unwrap().len();
            let b = with_dict.wrap(&record).unwrap().len();
            assert!(b < a, "dictionary frame {b} >= plain frame {a}");
            total_plain += a;
            total_dict += b;
        }
        assert!(total_dict < total_plain, "{total_dict} vs {total_plain}");
    }

    #[test]
    fn test_dictionary_roundtrip_through_streams() {
        let dict = train_dictionary(&json_samples(1000, 2), 4096).unwrap();
        let copts = Arc::new(CompressionOptions::with_dictionary(&dict, 5).unwrap());
        let dopts = Arc::new(DecompressionOptions::with_dictionary(&dict).unwrap());
        let payload: Vec<u8> = json_samples(200, 3).concat();

        let mut s = CompressionStream::with_options(Vec::new(), copts).unwrap();
        std::io::Write::write_all(&mut s, &payload).unwrap();
        let frame = s.finish().unwrap();

        let mut r = DecompressionStream::with_options(&frame[..], dopts).unwrap();
        let mut back = Vec::new();
        std::io::Read::read_to_end(&mut r, &mut back).unwrap();
        assert_eq!(back, payload);
    }

    // # ✅ 3. Mismatch is reported, never silently corrupt
    #[test]
    fn test_wrong_or_missing_dictionary_is_codec_error() {
        let dict_a = train_dictionary(&json_samples(1000, 1), 4096).unwrap();
        let dict_b = train_dictionary(&log_samples(1000, 2), 4096).unwrap();
        let record = json_samples(1, 500).remove(0);
        let frame = compressor(Some(&dict_a)).wrap(&record).unwrap();

        let err = decompressor(Some(&dict_b)).unwrap(&frame).unwrap_err();
        assert!(err.is_codec(), "{err:?}");
        assert!(err.native_code().is_some());

        let err = decompressor(None).unwrap(&frame).unwrap_err();
        assert!(err.is_codec(), "{err:?}");

        assert_eq!(decompressor(Some(&dict_a)).unwrap(&frame).unwrap(), record);
    }
}
