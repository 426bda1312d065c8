// src/normalize/riff.rs

// A wave file written to a pipe cannot be seeked back to, so the encoder
// leaves placeholder sizes in the RIFF and data chunk headers.

const RIFF_HEADER: usize = 12;
const CHUNK_HEADER: usize = 8;

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn write_u32(bytes: &mut [u8], at: usize, value: u32) {
    bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

/// Rewrites the RIFF size and the `data` chunk size to match the buffer when
/// they claim more bytes than are present. Returns true when anything changed.
/// Non-wave buffers are left alone.
pub fn patch_streamed_sizes(bytes: &mut [u8]) -> bool {
    if bytes.len() < RIFF_HEADER || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return false;
    }
    let Ok(total) = u32::try_from(bytes.len()) else {
        return false;
    };

    let mut patched = false;
    let riff_size = total - CHUNK_HEADER as u32;
    if read_u32(bytes, 4) != riff_size {
        write_u32(bytes, 4, riff_size);
        patched = true;
    }

    let mut pos = RIFF_HEADER;
    while pos + CHUNK_HEADER <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = read_u32(bytes, pos + 4) as usize;
        let body = pos + CHUNK_HEADER;
        let remaining = bytes.len() - body;

        if id == b"data" {
            if size > remaining {
                write_u32(bytes, pos + 4, remaining as u32);
                patched = true;
            }
            break;
        }
        // chunks are word aligned
        let next = body.saturating_add(size).saturating_add(size & 1);
        if next <= pos {
            break;
        }
        pos = next;
    }
    patched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streamed_wav(payload: &[u8]) -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(b"RIFF");
        v.extend_from_slice(&u32::MAX.to_le_bytes());
        v.extend_from_slice(b"WAVE");
        v.extend_from_slice(b"fmt ");
        v.extend_from_slice(&16u32.to_le_bytes());
        v.extend_from_slice(&[0u8; 16]);
        v.extend_from_slice(b"data");
        v.extend_from_slice(&u32::MAX.to_le_bytes());
        v.extend_from_slice(payload);
        v
    }

    #[test]
    fn placeholder_sizes_are_replaced() {
        let mut wav = streamed_wav(&[1, 2, 3, 4, 5, 6]);
        assert!(patch_streamed_sizes(&mut wav));
        assert_eq!(read_u32(&wav, 4) as usize, wav.len() - 8);
        assert_eq!(read_u32(&wav, 40), 6);
    }

    #[test]
    fn correct_header_is_untouched() {
        let mut wav = streamed_wav(&[0; 4]);
        patch_streamed_sizes(&mut wav);
        let before = wav.clone();
        assert!(!patch_streamed_sizes(&mut wav));
        assert_eq!(wav, before);
    }

    #[test]
    fn other_containers_are_ignored() {
        let mut ogg = b"OggS\0\x02rest-of-page".to_vec();
        let before = ogg.clone();
        assert!(!patch_streamed_sizes(&mut ogg));
        assert_eq!(ogg, before);
    }
}
