use std::hash::Hash;

use indexmap::IndexSet;

/// Set that remembers the order of the *last* insertion of each element.
///
/// Re-inserting an element moves it to the end. Used to de-duplicate synthesized
/// base lists so a later repeated base takes precedence.
#[derive(Debug, Clone)]
pub struct LastOrderedSet<T> {
	inner: IndexSet<T>,
}

impl<T> Default for LastOrderedSet<T> {
	fn default() -> Self {
		Self { inner: IndexSet::new() }
	}
}

impl<T: Hash + Eq> LastOrderedSet<T> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, value: T) {
		self.inner.shift_remove(&value);
		self.inner.insert(value);
	}

	pub fn contains(&self, value: &T) -> bool {
		self.inner.contains(value)
	}

	pub fn iter(&self) -> impl Iterator<Item = &T> {
		self.inner.iter()
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn into_vec(self) -> Vec<T> {
		self.inner.into_iter().collect()
	}
}

impl<T: Hash + Eq> Extend<T> for LastOrderedSet<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		for value in iter {
			self.insert(value);
		}
	}
}

impl<T: Hash + Eq> FromIterator<T> for LastOrderedSet<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		let mut set = Self::new();
		set.extend(iter);
		set
	}
}
