// Thu Oct 15 2026 - Alex

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Alignment {
    value: usize,
}

impl Alignment {
    /// Rounds up to the next power of two; zero is treated as byte alignment.
    pub fn new(value: usize) -> Self {
        Self {
            value: value.max(1).next_power_of_two(),
        }
    }

    pub fn as_usize(&self) -> usize {
        self.value
    }

    pub fn align(&self, offset: usize) -> usize {
        (offset + self.value - 1) & !(self.value - 1)
    }

    pub fn is_aligned(&self, offset: usize) -> bool {
        offset & (self.value - 1) == 0
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_rounds_up() {
        let align = Alignment::new(8);
        assert_eq!(align.align(0), 0);
        assert_eq!(align.align(1), 8);
        assert_eq!(align.align(16), 16);
        assert!(align.is_aligned(24));
        assert!(!align.is_aligned(12));
    }

    #[test]
    fn test_non_power_of_two_is_rounded() {
        assert_eq!(Alignment::new(3).as_usize(), 4);
        assert_eq!(Alignment::new(0).as_usize(), 1);
    }
}
