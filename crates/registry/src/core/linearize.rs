//! C3 linearization over ordered base lists.

use std::collections::VecDeque;

use super::types::TypeHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("bases admit no consistent method resolution order")]
pub struct LinearizeError;

/// Merges the resolution orders of `bases` (and `bases` itself) into the tail of
/// a new type's resolution order.
pub(crate) fn c3_merge(bases: &[TypeHandle]) -> Result<Vec<TypeHandle>, LinearizeError> {
	let mut seqs: Vec<VecDeque<TypeHandle>> = bases.iter().map(|b| b.mro().cloned().collect()).collect();
	seqs.push(bases.iter().cloned().collect());

	let mut out = Vec::new();
	loop {
		seqs.retain(|s| !s.is_empty());
		if seqs.is_empty() {
			return Ok(out);
		}

		let head = seqs
			.iter()
			.map(|s| &s[0])
			.find(|candidate| !seqs.iter().any(|s| s.iter().skip(1).any(|t| t == *candidate)))
			.cloned()
			.ok_or(LinearizeError)?;

		for seq in &mut seqs {
			if seq.front() == Some(&head) {
				seq.pop_front();
			}
		}
		out.push(head);
	}
}
