use crate::utils::sha256_hex;

/// Merkle root computation over an ordered list of transaction hashes
///
/// The reduction is order-sensitive: reordering the input changes the
/// root even for the same set of hashes.
pub struct MerkleTree;

impl MerkleTree {
    /// Combine two hex-string hashes into their parent hash
    pub fn combine(left: &str, right: &str) -> String {
        sha256_hex(format!("{left}{right}").as_bytes())
    }

    /// Reduce an ordered hash list to a single root.
    ///
    /// Empty input yields the empty string; a single hash is paired with
    /// itself; at every level an odd trailing hash is paired with itself.
    pub fn root(hashes: &[String]) -> String {
        if hashes.is_empty() {
            return String::new();
        }
        if hashes.len() == 1 {
            return Self::combine(&hashes[0], &hashes[0]);
        }

        let mut current_level = hashes.to_vec();
        while current_level.len() > 1 {
            let mut next_level = Vec::with_capacity(current_level.len().div_ceil(2));
            let mut i = 0;
            while i < current_level.len() {
                let left = &current_level[i];
                let right = if i + 1 < current_level.len() {
                    &current_level[i + 1]
                } else {
                    // Odd number of hashes: the last one pairs with itself
                    left
                };
                next_level.push(Self::combine(left, right));
                i += 2;
            }
            current_level = next_level;
        }

        current_level.swap_remove(0)
    }
}
