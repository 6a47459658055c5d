//! Stable digests used to derive cache artifact filenames.
//!
//! Both fingerprints hash a canonical, order-preserving serialization of
//! their input pairs, so identical inputs digest identically within and
//! across processes, and any change to membership, order, or values changes
//! the digest. Collisions are treated as unreachable.

use sha2::{Digest, Sha256};

use crate::models::{RegionOutput, ScriptGroup};

/// Digest over the ordered handle and path membership of a group.
///
/// Deliberately ignores modification times: content changes invalidate the
/// aggregated bundle through [`region_fingerprint`], while this digest only
/// moves when the group's membership or paths move.
pub fn content_fingerprint(group: &ScriptGroup) -> String {
  let pairs: Vec<(&str, String)> = group
    .files()
    .iter()
    .map(|(handle, path)| (handle.as_str(), path.to_string_lossy().into_owned()))
    .collect();
  digest(&canonical(&pairs))
}

/// Digest over the ordered key and mtime listing of a region's generated bundles.
pub fn region_fingerprint(output: &RegionOutput) -> String {
  let pairs: Vec<(&str, i64)> = output
    .entries()
    .iter()
    .map(|artifact| (artifact.key.as_str(), artifact.mtime))
    .collect();
  digest(&canonical(&pairs))
}

fn canonical(pairs: &impl serde::Serialize) -> Vec<u8> {
  serde_json::to_vec(pairs).expect("string/integer pairs always serialize")
}

fn digest(bytes: &[u8]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(bytes);
  hex::encode(hasher.finalize())
}
