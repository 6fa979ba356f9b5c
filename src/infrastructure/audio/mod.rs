//! PCM helpers for synthesized speech.
//!
//! The speech engine returns raw 16-bit little-endian mono PCM. Pitch is
//! changed by resampling: the waveform is read `pitch_factor` samples per
//! output sample and played back at the original rate, which scales every
//! frequency by the factor (and the duration by its inverse).

use std::io::Cursor;

/// Decode raw little-endian 16-bit PCM. A trailing odd byte is dropped.
pub fn pcm16le_to_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Resample `samples` so that playback at the same rate is `pitch_factor`
/// times higher. Uses linear interpolation between neighbouring samples.
pub fn shift_pitch(samples: &[i16], pitch_factor: f64) -> Vec<i16> {
    if samples.is_empty() || !pitch_factor.is_finite() || pitch_factor <= 0.0 {
        return samples.to_vec();
    }
    if (pitch_factor - 1.0).abs() < f64::EPSILON {
        return samples.to_vec();
    }

    // Epsilon absorbs representation error in factors like 0.8
    let output_len = ((samples.len() as f64) / pitch_factor + 1e-9).floor() as usize;
    let last = samples.len() - 1;

    (0..output_len)
        .map(|i| {
            let position = i as f64 * pitch_factor;
            let index = (position.floor() as usize).min(last);
            let next = (index + 1).min(last);
            let fraction = position - index as f64;

            let current = samples[index] as f64;
            let following = samples[next] as f64;
            let value = current + (following - current) * fraction;

            value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16
        })
        .collect()
}

/// Wrap mono 16-bit samples in a WAV container
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}
