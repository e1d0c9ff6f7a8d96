/// Hands a value to the allocator for the life of the process, trading the
/// drop for a `'static` borrow the task spawns require.
pub fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}
