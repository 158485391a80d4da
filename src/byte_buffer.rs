const MSB_MASK: u64 = 0x8080_8080_8080_8080;
const LSB_MASK: u64 = 0x0101_0101_0101_0101;

pub trait ByteBuffer {
    /// Index of the first `needle`, scanning a word at a time.
    fn byte_position(&self, needle: u8) -> Option<usize>;

    /// Splits at the first `;` into `(key, value)`.
    fn split_delimiter(&self) -> Option<(&[u8], &[u8])>;

    /// Drops a single trailing `\r` left over from CRLF input.
    fn trim_line_end(&self) -> &[u8];
}

impl ByteBuffer for [u8] {
    #[inline(always)]
    fn byte_position(&self, needle: u8) -> Option<usize> {
        let mut i = 0;

        let repeat = LSB_MASK * needle as u64;
        while i + 8 <= self.len() {
            let chunk = unsafe { (self.as_ptr().add(i) as *const u64).read_unaligned() };
            let xored = chunk ^ repeat;
            let matching_bytes = xored.wrapping_sub(LSB_MASK) & !xored & MSB_MASK;

            if matching_bytes != 0 {
                // Borrows out of a lower zero byte can set false bits above it,
                // never below, so on big-endian we fall back to a byte scan.
                if cfg!(target_endian = "little") {
                    let j = (matching_bytes.trailing_zeros() / 8) as usize;
                    return Some(i + j);
                }

                return self[i..i + 8]
                    .iter()
                    .position(|&b| b == needle)
                    .map(|j| i + j);
            }

            i += 8;
        }

        while i < self.len() {
            if self[i] == needle {
                return Some(i);
            }
            i += 1;
        }

        None
    }

    #[inline(always)]
    fn split_delimiter(&self) -> Option<(&[u8], &[u8])> {
        let pos = self.byte_position(b';')?;
        Some((&self[..pos], &self[pos + 1..]))
    }

    #[inline(always)]
    fn trim_line_end(&self) -> &[u8] {
        match self.last() {
            Some(b'\r') => &self[..self.len() - 1],
            _ => self,
        }
    }
}
