/// Separator between the target and the method in `"Identifier::method"` listeners
pub const LISTENER_SEPARATOR: &str = "::";

/// Priority used by [`EventDispatcher::listen`](crate::EventDispatcher::listen)
pub const DEFAULT_PRIORITY: i64 = 0;

/// Highest priority a listener may be registered at
pub const MAX_PRIORITY: i64 = u32::MAX as i64;
