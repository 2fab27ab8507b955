#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read, Write};
    use std::pin::Pin;
    use std::sync::Arc;
    use std::task::{Context, Poll};

    use futures::executor::block_on;
    use futures::FutureExt;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
    use zstd_bridge::prelude::*;
    use zstd_bridge::stream::{CompressState, DecompressState};

    const MIB: usize = 1024 * 1024;

    fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        StdRng::seed_from_u64(seed).fill_bytes(&mut buf);
        buf
    }

    fn sequential_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|i| i as u8).collect()
    }

    fn text_bytes(len: usize, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        let words: [&[u8]; 6] = [b"stream ", b"frame ", b"buffer ", b"codec ", b"flush ", b"\n"];
        let mut out = Vec::with_capacity(len + 8);
        while out.len() < len {
            out.extend_from_slice(words[rng.gen_range(0..words.len())]);
        }
        out.truncate(len);
        out
    }

    /// Compress through the blocking stream, writing in random-sized chunks.
    fn stream_compress(src: &[u8], seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut s = CompressionStream::new(Vec::new()).unwrap();
        let mut at = 0;
        while at < src.len() {
            let n = rng.gen_range(1..=64 * 1024).min(src.len() - at);
            s.write_all(&src[at..at + n]).unwrap();
            at += n;
        }
        s.finish().unwrap()
    }

    fn stream_decompress(frame: &[u8], config: StreamConfig) -> Vec<u8> {
        let opts = Arc::new(DecompressionOptions::default());
        let mut r = DecompressionStream::with_config(Cursor::new(frame), opts, config).unwrap();
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        out
    }

    // # ✅ 1. Streaming and one-shot are interchangeable
    #[test]
    fn test_stream_compress_then_one_shot_decompress() {
        for src in [random_bytes(MIB, 1), sequential_bytes(MIB + 17)] {
            let frame = stream_compress(&src, 2);
            // Streamed frames carry no content size; decompress into a sized buffer.
            assert!(Decompressor::decompressed_size(&frame).is_err());
            let mut out = vec![0u8; src.len()];
            let n = Decompressor::new().unwrap().unwrap_into(&frame, &mut out, 0, true).unwrap();
            assert_eq!(n, src.len());
            assert!(out == src);
        }
    }

    #[test]
    fn test_one_shot_compress_then_stream_decompress() {
        for src in [random_bytes(MIB, 3), sequential_bytes(MIB)] {
            let frame = Compressor::new().unwrap().wrap(&src).unwrap();
            let out = stream_decompress(&frame, StreamConfig::default());
            assert!(out == src);
        }
    }

    // # ✅ 2. Chunk boundaries do not change the output
    #[test]
    fn test_tiny_and_empty_writes_match_single_write() {
        let src = text_bytes(300_000, 4);

        let mut whole = CompressionStream::new(Vec::new()).unwrap();
        whole.write_all(&src).unwrap();
        let expected = whole.finish().unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        let mut pieces = CompressionStream::new(Vec::new()).unwrap();
        let mut at = 0;
        while at < src.len() {
            let n = match rng.gen_range(0..4) {
                0 => 0,
                1 => 1,
                _ => rng.gen_range(2..5000),
            }
            .min(src.len() - at);
            assert_eq!(pieces.write(&src[at..at + n]).unwrap(), n);
            at += n;
        }
        let actual = pieces.finish().unwrap();

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_flush_makes_written_data_decodable() {
        let first = text_bytes(50_000, 6);
        let second = text_bytes(20_000, 7);

        let mut s = CompressionStream::new(Vec::new()).unwrap();
        s.write_all(&first).unwrap();
        s.flush().unwrap();
        assert_eq!(s.state(), CompressState::Flushed);

        // Frame is still open, yet everything written so far decodes.
        let partial = s.get_ref().unwrap().clone();
        assert_eq!(stream_decompress(&partial, StreamConfig::default()), first);

        s.write_all(&second).unwrap();
        let frame = s.finish().unwrap();
        let mut all = first.clone();
        all.extend_from_slice(&second);
        assert_eq!(zstd::decode_all(&frame[..]).unwrap(), all);
    }

    #[test]
    fn test_finish_without_flush_produces_valid_frame() {
        let src = text_bytes(200_000, 8);
        let mut s = CompressionStream::new(Vec::new()).unwrap();
        s.write_all(&src).unwrap();
        let frame = s.finish().unwrap();
        assert_eq!(zstd::decode_all(&frame[..]).unwrap(), src);
    }

    #[test]
    fn test_empty_stream_is_a_valid_empty_frame() {
        let frame = CompressionStream::new(Vec::new()).unwrap().finish().unwrap();
        assert!(!frame.is_empty());
        assert!(stream_decompress(&frame, StreamConfig::default()).is_empty());
    }

    // # ✅ 3. Tiny internal buffers still work
    #[test]
    fn test_one_byte_internal_buffers() {
        let src = text_bytes(20_000, 9);
        let config = StreamConfig::new(Some(1), Some(false));
        let mut s = CompressionStream::with_config(
            Vec::new(),
            Arc::new(CompressionOptions::default()),
            config.clone(),
        )
        .unwrap();
        s.write_all(&src).unwrap();
        s.flush().unwrap();
        let stats = s.stats();
        let frame = s.finish().unwrap();
        assert!(stats.counters.io_calls > 1);
        assert_eq!(stats.counters.io_calls, stats.counters.bytes_out);

        assert_eq!(stream_decompress(&frame, config), src);
    }

    #[test]
    fn test_partial_reads_follow_caller_sizes() {
        let src = text_bytes(100_000, 10);
        let frame = Compressor::new().unwrap().wrap(&src).unwrap();
        let mut r = DecompressionStream::new(&frame[..]).unwrap();

        let mut out = Vec::new();
        let mut rng = StdRng::seed_from_u64(11);
        loop {
            let mut buf = vec![0u8; rng.gen_range(1..700)];
            let n = r.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        assert_eq!(out, src);
        assert_eq!(r.state(), DecompressState::Exhausted);
    }

    #[test]
    fn test_concatenated_frames_decode_in_sequence() {
        let a = text_bytes(10_000, 12);
        let b = random_bytes(10_000, 13);
        let mut c = Compressor::new().unwrap();
        let mut frames = c.wrap(&a).unwrap();
        frames.extend(c.wrap(&b).unwrap());

        let mut expected = a;
        expected.extend_from_slice(&b);
        assert_eq!(stream_decompress(&frames, StreamConfig::with_buffer_size(333)), expected);
    }

    #[test]
    fn test_failing_sink_poisons_stream() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut s = CompressionStream::new(Broken).unwrap();
        s.write_all(b"buffered, not yet written").unwrap();
        let err = s.flush().unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
        assert_eq!(s.state(), CompressState::Failed);
        assert!(matches!(s.finish(), Err(ZstdError::Poisoned)));
    }

    // # ✅ 4. Async adapters
    #[test]
    fn test_async_roundtrip_over_cursor() {
        let src = text_bytes(400_000, 14);
        block_on(async {
            let mut w = AsyncCompressionStream::new(futures::io::Cursor::new(Vec::new())).unwrap();
            for chunk in src.chunks(7_777) {
                w.write(chunk).await.unwrap();
            }
            w.write(&[]).await.unwrap();
            w.flush().await.unwrap();
            let frame = w.finish().await.unwrap().into_inner();

            let mut r = AsyncDecompressionStream::new(futures::io::Cursor::new(frame)).unwrap();
            let mut out = Vec::new();
            let n = r.read_to_end(&mut out).await.unwrap();
            assert_eq!(n, src.len());
            assert!(out == src);
            assert_eq!(r.state(), DecompressState::Exhausted);
        });
    }

    #[test]
    fn test_async_and_blocking_streams_agree() {
        let src = text_bytes(150_000, 15);
        let mut s = CompressionStream::new(Vec::new()).unwrap();
        s.write_all(&src).unwrap();
        let blocking = s.finish().unwrap();

        let asynchronous = block_on(async {
            let mut w = AsyncCompressionStream::new(futures::io::Cursor::new(Vec::new())).unwrap();
            w.write(&src).await.unwrap();
            w.finish().await.unwrap().into_inner()
        });
        assert_eq!(asynchronous, blocking);
    }

    #[test]
    fn test_async_zero_length_read_returns_zero() {
        let frame = Compressor::new().unwrap().wrap(b"abc").unwrap();
        block_on(async {
            let mut r = AsyncDecompressionStream::new(futures::io::Cursor::new(frame)).unwrap();
            assert_eq!(r.read(&mut []).await.unwrap(), 0);
            let mut buf = [0u8; 8];
            assert_eq!(r.read(&mut buf).await.unwrap(), 3);
            assert_eq!(&buf[..3], b"abc");
        });
    }

    /// Sink that takes at most 10 bytes per write and stalls on chosen polls.
    struct ShortSink {
        bytes: Vec<u8>,
        polls: usize,
        stall: fn(usize) -> bool,
    }

    impl ShortSink {
        fn new(stall: fn(usize) -> bool) -> Self {
            Self { bytes: Vec::new(), polls: 0, stall }
        }
    }

    impl futures::io::AsyncWrite for ShortSink {
        fn poll_write(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            self.polls += 1;
            if (self.stall)(self.polls) {
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            let n = buf.len().min(10);
            self.bytes.extend_from_slice(&buf[..n]);
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    /// Source that hands out at most 7 bytes and stalls on every other poll.
    struct TrickleSource {
        data: Vec<u8>,
        at: usize,
        polls: usize,
    }

    impl futures::io::AsyncRead for TrickleSource {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            buf: &mut [u8],
        ) -> Poll<std::io::Result<usize>> {
            self.polls += 1;
            if self.polls % 2 == 0 {
                cx.waker().wake_by_ref();
                return Poll::Pending;
            }
            let n = buf.len().min(7).min(self.data.len() - self.at);
            buf[..n].copy_from_slice(&self.data[self.at..self.at + n]);
            self.at += n;
            Poll::Ready(Ok(n))
        }
    }

    #[test]
    fn test_cancelled_async_write_poisons_stream() {
        let src = random_bytes(300_000, 21);
        let mut w = AsyncCompressionStream::with_config(
            ShortSink::new(|poll| poll == 4),
            Arc::new(CompressionOptions::default()),
            StreamConfig::with_buffer_size(256),
        )
        .unwrap();

        // The sink took 30 bytes of a full buffer, then stalled; the caller gave up.
        assert!(w.write(&src).now_or_never().is_none());
        assert_eq!(w.get_ref().unwrap().bytes.len(), 30);
        assert_eq!(w.state(), CompressState::Failed);

        assert!(matches!(block_on(w.write(&src)), Err(ZstdError::Poisoned)));
        assert!(matches!(block_on(w.finish()), Err(ZstdError::Poisoned)));
    }

    #[test]
    fn test_async_write_trait_resumes_partial_sink_writes() {
        use futures::io::AsyncWriteExt;

        let src = text_bytes(200_000, 22);
        let mut w = AsyncCompressionStream::with_config(
            ShortSink::new(|poll| poll % 3 == 0),
            Arc::new(CompressionOptions::default()),
            StreamConfig::with_buffer_size(256),
        )
        .unwrap();
        block_on(async {
            let copied = futures::io::copy(futures::io::Cursor::new(&src[..]), &mut w).await.unwrap();
            assert_eq!(copied, src.len() as u64);
            AsyncWriteExt::close(&mut w).await.unwrap();
        });
        assert_eq!(w.state(), CompressState::Ended);

        let frame = w.get_ref().unwrap().bytes.clone();
        assert!(zstd::decode_all(&frame[..]).unwrap() == src);
    }

    #[test]
    fn test_async_read_trait_over_stalling_source() {
        let src = text_bytes(50_000, 23);
        let frame = Compressor::new().unwrap().wrap(&src).unwrap();
        let r = AsyncDecompressionStream::with_config(
            TrickleSource { data: frame, at: 0, polls: 0 },
            Arc::new(DecompressionOptions::default()),
            StreamConfig::with_buffer_size(64),
        )
        .unwrap();

        let mut out = Vec::new();
        let copied = block_on(futures::io::copy(r, &mut out)).unwrap();
        assert_eq!(copied, src.len() as u64);
        assert!(out == src);
    }

    // # ✅ 5. Properties
    proptest! {
        #[test]
        fn prop_stream_roundtrip_any_split(
            data in proptest::collection::vec(any::<u8>(), 0..8192),
            split in 0usize..8192,
        ) {
            let cut = split.min(data.len());
            let mut s = CompressionStream::with_config(
                Vec::new(),
                Arc::new(CompressionOptions::default()),
                StreamConfig::with_buffer_size(64),
            ).unwrap();
            s.write_all(&data[..cut]).unwrap();
            s.flush().unwrap();
            s.write_all(&data[cut..]).unwrap();
            let frame = s.finish().unwrap();
            prop_assert_eq!(stream_decompress(&frame, StreamConfig::with_buffer_size(64)), data);
        }
    }
}
