//! Registry trait for self-registering implementations.

/// Implemented by each backend so it can be looked up by its config name.
///
/// `NAME` is the key used under `[collection.implementations.<NAME>]` and the
/// factory builds the backend from that table.
pub trait ImplementationRegistry {
	/// Configuration name of the implementation.
	const NAME: &'static str;
	/// Factory function type for the implementation family.
	type Factory;

	/// Returns the factory for this implementation.
	fn factory() -> Self::Factory;
}
