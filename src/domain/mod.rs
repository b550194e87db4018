// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing what the
// chatbot works with: intents, training examples, greetings,
// conversation turns, and the errors the core can raise.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// Intent records, flattened training examples, greeting phrases
pub mod intent;

// One logged conversation turn
pub mod conversation;

// Typed errors raised by the matching core
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
