/// Router Module Index
///
/// Routing stays deliberately thin: method + path binding only. The record
/// router never reaches a controller operation with an unvalidated id; ids
/// arrive as raw path strings and go through the identifier codec inside the
/// handlers before any store call.

/// The parametric CRUD router, instantiated once per resource collection.
pub mod records;
