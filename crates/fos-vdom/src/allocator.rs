//! Identifier Allocator
//!
//! Position-derived identifiers: FNV-1a (32 bit) over
//! `"{parent_path}{separator}{child_count}"`, rendered in decimal.
//! Deterministic for the same inputs, not globally unique.

const FNV_OFFSET_BASIS: u32 = 0x811c9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Streaming FNV-1a hasher
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a32 {
    state: u32,
}

impl Default for Fnv1a32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Fnv1a32 {
    pub fn new() -> Self {
        Self { state: FNV_OFFSET_BASIS }
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u32;
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    pub fn finish(self) -> u32 {
        self.state
    }
}

/// One-shot FNV-1a
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hasher = Fnv1a32::new();
    hasher.write(bytes);
    hasher.finish()
}

/// Synthesizes identifiers for records inserted without one
#[derive(Debug, Clone)]
pub struct IdentifierAllocator {
    separator: String,
}

impl Default for IdentifierAllocator {
    fn default() -> Self {
        Self::new("-")
    }
}

impl IdentifierAllocator {
    pub fn new(separator: &str) -> Self {
        Self { separator: separator.to_string() }
    }

    /// Identifier for the `child_count`-th child under `parent_path`
    pub fn allocate(&self, parent_path: &str, child_count: usize) -> String {
        let mut hasher = Fnv1a32::new();
        hasher.write(parent_path.as_bytes());
        hasher.write(self.separator.as_bytes());
        hasher.write(child_count.to_string().as_bytes());
        hasher.finish().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_reference_vectors() {
        assert_eq!(fnv1a_32(b""), 0x811c9dc5);
        assert_eq!(fnv1a_32(b"a"), 0xe40c292c);
        assert_eq!(fnv1a_32(b"foobar"), 0xbf9cf968);
    }

    #[test]
    fn test_allocate_matches_joined_input() {
        let alloc = IdentifierAllocator::default();
        assert_eq!(alloc.allocate("html", 2), fnv1a_32(b"html-2").to_string());
        assert_eq!(alloc.allocate("html/body", 0), fnv1a_32(b"html/body-0").to_string());
    }

    #[test]
    fn test_allocate_is_deterministic() {
        let a = IdentifierAllocator::default();
        let b = IdentifierAllocator::default();
        assert_eq!(a.allocate("html/body", 7), b.allocate("html/body", 7));
        assert_ne!(a.allocate("html/body", 7), a.allocate("html/body", 8));
        assert!(a.allocate("html/body", 7).chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_separator_is_part_of_input() {
        let dash = IdentifierAllocator::new("-");
        let colon = IdentifierAllocator::new(":");
        assert_ne!(dash.allocate("html", 1), colon.allocate("html", 1));
    }
}
