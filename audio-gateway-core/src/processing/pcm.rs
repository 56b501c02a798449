//! PCM byte-shuffling for the hardware's slot layout.
//!
//! Pure functions over byte slices, no platform dependencies.

/// Swap each pair of 16-bit samples in place: `s0,s1,s2,s3 -> s1,s0,s3,s2`.
///
/// The output channel's slot layout expects sample pairs in swapped order;
/// the voice-output worker applies this to every chunk before the hardware
/// write. A trailing lone sample is left untouched.
pub fn swap_sample_pairs(pcm: &mut [u8]) {
    for quad in pcm.chunks_exact_mut(4) {
        quad.swap(0, 2);
        quad.swap(1, 3);
    }
}

/// Extract 16-bit PCM from 32-bit capture words.
///
/// The capture hardware delivers a 24-bit sample left-aligned in each
/// little-endian 32-bit word; the significant 16 bits are bytes 2 and 3.
/// Trailing bytes short of a full word are discarded.
pub fn capture_words_to_pcm(words: &[u8]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(words.len() / 2);
    for word in words.chunks_exact(4) {
        pcm.push(word[2]);
        pcm.push(word[3]);
    }
    pcm
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_bytes(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn swaps_sample_pairs() {
        let mut pcm = as_bytes(&[1, 2, 3, 4]);
        swap_sample_pairs(&mut pcm);
        assert_eq!(pcm, as_bytes(&[2, 1, 4, 3]));
    }

    #[test]
    fn lone_trailing_sample_untouched() {
        let mut pcm = as_bytes(&[1, 2, 3]);
        swap_sample_pairs(&mut pcm);
        assert_eq!(pcm, as_bytes(&[2, 1, 3]));
    }

    #[test]
    fn extracts_high_bytes_of_capture_word() {
        // word 0x12345600, little-endian bytes 00 56 34 12
        let words = 0x1234_5600u32.to_le_bytes();
        assert_eq!(capture_words_to_pcm(&words), vec![0x56, 0x34]);
        assert_eq!(
            i16::from_le_bytes([0x56, 0x34]),
            0x3456,
        );
    }

    #[test]
    fn partial_trailing_word_discarded() {
        let mut words = 0x7fff_0000u32.to_le_bytes().to_vec();
        words.extend_from_slice(&[0xaa, 0xbb]);
        assert_eq!(capture_words_to_pcm(&words), vec![0xff, 0x7f]);
    }
}
