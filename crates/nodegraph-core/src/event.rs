//! Event identity, host-side event sources, and the global dispatch hook.
//!
//! Every exposed event owns a process-stable [`EventId`]: the high 54 bits
//! identify the declaring module, the low 10 bits are a per-module counter
//! assigned in declaration order. Ids are baked into the generated
//! `GET_EVENTID_*` accessors, so the same source always yields the same id.
//!
//! Hosts hold an [`EventSource`] field per exposed event. The generated
//! handler pushes the event arguments onto the current context stack and
//! forwards `(sender, id)` to the process-wide hook installed by the
//! interpreter.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use lazy_static::lazy_static;

use crate::convert::StackValue;
use crate::object::ObjRef;
use crate::stack::{ValueStack, with_current_stack};
use crate::value::ValueKind;

/// Globally unique, deterministic identity of an exposed event.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EventId(u64);

impl EventId {
    /// Low bits carrying the per-module counter.
    pub const COUNTER_MASK: u64 = 0x3FF;

    /// Most events a single module may declare.
    pub const MAX_PER_MODULE: u64 = 1023;

    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        EventId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// The module-identity half, shared by all events of one module.
    #[inline]
    pub const fn module_prefix(self) -> u64 {
        self.0 & !Self::COUNTER_MASK
    }

    /// The per-module declaration counter.
    #[inline]
    pub const fn counter(self) -> u16 {
        (self.0 & Self::COUNTER_MASK) as u16
    }
}

impl fmt::Debug for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventId({:#018x})", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// Argument pack of an event, pushed onto the context stack when it fires.
///
/// Implemented for tuples of stack payload types up to arity four. `KINDS`
/// is in declaration order; `push_all` pushes in the same order.
pub trait EventArgs: Clone + Send + Sync + 'static {
    const KINDS: &'static [ValueKind];

    fn push_all(&self, stack: &mut ValueStack);
}

impl EventArgs for () {
    const KINDS: &'static [ValueKind] = &[];

    fn push_all(&self, _stack: &mut ValueStack) {}
}

macro_rules! impl_event_args {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name),+> EventArgs for ($($name,)+)
        where
            $($name: StackValue + Clone + Send + Sync + 'static,)+
        {
            const KINDS: &'static [ValueKind] = &[$($name::KIND),+];

            fn push_all(&self, stack: &mut ValueStack) {
                $(stack.push(self.$idx.clone().into_value());)+
            }
        }
    };
}

impl_event_args!(A: 0);
impl_event_args!(A: 0, B: 1);
impl_event_args!(A: 0, B: 1, C: 2);
impl_event_args!(A: 0, B: 1, C: 2, D: 3);

/// Host-side handler signature bound by the generated subscribe wrappers.
pub type EventHandler<A> = fn(&ObjRef, &A);

/// Token returned by [`EventSource::add`], used to remove the handler again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerToken(u64);

/// A host object's outlet for one exposed event.
///
/// The host raises it with the sender reference and the argument pack; every
/// registered handler (normally the generated `HANDLE_*` thunk) runs in
/// registration order.
pub struct EventSource<A: EventArgs> {
    handlers: Mutex<Vec<(HandlerToken, EventHandler<A>)>>,
    next_token: AtomicU64,
}

impl<A: EventArgs> EventSource<A> {
    pub fn new() -> Self {
        EventSource {
            handlers: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(1),
        }
    }

    /// Register a handler, returning its removal token.
    pub fn add(&self, handler: EventHandler<A>) -> HandlerToken {
        let token = HandlerToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        self.lock().push((token, handler));
        token
    }

    /// Remove a previously registered handler. Unknown tokens are ignored.
    pub fn remove(&self, token: HandlerToken) -> bool {
        let mut handlers = self.lock();
        let before = handlers.len();
        handlers.retain(|(t, _)| *t != token);
        handlers.len() != before
    }

    /// Invoke every registered handler.
    pub fn raise(&self, sender: &ObjRef, args: &A) {
        let snapshot: Vec<EventHandler<A>> =
            self.lock().iter().map(|(_, handler)| *handler).collect();
        for handler in snapshot {
            handler(sender, args);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(HandlerToken, EventHandler<A>)>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<A: EventArgs> Default for EventSource<A> {
    fn default() -> Self {
        EventSource::new()
    }
}

impl<A: EventArgs> fmt::Debug for EventSource<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

/// Process-wide sink for raised events, installed by the interpreter.
pub type EventHook = Arc<dyn Fn(&ObjRef, EventId) + Send + Sync>;

lazy_static! {
    static ref EVENT_HOOK: RwLock<Option<EventHook>> = RwLock::new(None);
}

/// Install the process-wide event hook, replacing any previous one.
pub fn set_event_hook(hook: EventHook) {
    *EVENT_HOOK
        .write()
        .unwrap_or_else(PoisonError::into_inner) = Some(hook);
}

/// Remove the process-wide event hook.
pub fn clear_event_hook() {
    *EVENT_HOOK
        .write()
        .unwrap_or_else(PoisonError::into_inner) = None;
}

/// Forward a raised event to the installed hook, if any.
///
/// Called by generated `HANDLE_*` thunks after the event arguments have been
/// pushed onto the current context stack. With no hook installed the event
/// is dropped; the thunk's drain pass still clears the pushed arguments.
pub fn dispatch_event(sender: &ObjRef, id: EventId) {
    let hook = EVENT_HOOK
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    if let Some(hook) = hook {
        hook(sender, id);
    }
}

/// Push `args`, notify the hook, then drain anything the hook left behind.
///
/// This is the shared tail of every generated event handler; keeping it here
/// keeps the generated code to a single call.
pub fn raise_to_hook<A: EventArgs>(sender: &ObjRef, id: EventId, args: &A) {
    let depth = with_current_stack(|stack| {
        let depth = stack.len();
        args.push_all(stack);
        depth
    });
    dispatch_event(sender, id);
    with_current_stack(|stack| {
        while stack.len() > depth {
            let _ = stack.pop_discard();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::reset_current_stack;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn event_id_field_split() {
        let id = EventId::from_raw((0xABCD_EF12_3456_7800 & !EventId::COUNTER_MASK) | 0x2A);
        assert_eq!(id.counter(), 0x2A);
        assert_eq!(id.module_prefix() & EventId::COUNTER_MASK, 0);
        assert_eq!(id.raw(), id.module_prefix() | id.counter() as u64);
    }

    #[test]
    fn source_add_remove() {
        let source: EventSource<(i32,)> = EventSource::new();
        fn handler(_sender: &ObjRef, _args: &(i32,)) {}

        let token = source.add(handler);
        assert_eq!(source.handler_count(), 1);
        assert!(source.remove(token));
        assert!(!source.remove(token));
        assert_eq!(source.handler_count(), 0);
    }

    #[test]
    fn raise_runs_handlers() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        fn handler(_sender: &ObjRef, args: &(i32,)) {
            assert_eq!(args.0, 11);
            CALLS.fetch_add(1, Ordering::SeqCst);
        }

        let source: EventSource<(i32,)> = EventSource::new();
        source.add(handler);
        source.raise(&ObjRef::null(), &(11,));
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn raise_to_hook_drains_arguments() {
        reset_current_stack();
        let id = EventId::from_raw(0x1400);
        raise_to_hook(&ObjRef::null(), id, &(3i32, 4.0f32));
        with_current_stack(|stack| assert!(stack.is_empty()));
    }

    #[test]
    fn hook_receives_sender_and_id() {
        static SEEN: AtomicU64 = AtomicU64::new(0);
        set_event_hook(Arc::new(|_sender, id| {
            // other tests may dispatch concurrently; only record our id
            if id.raw() == 0x77 {
                SEEN.store(id.raw(), Ordering::SeqCst);
            }
        }));
        dispatch_event(&ObjRef::null(), EventId::from_raw(0x77));
        clear_event_hook();
        assert_eq!(SEEN.load(Ordering::SeqCst), 0x77);
    }

    #[test]
    fn event_args_kinds_in_declaration_order() {
        assert_eq!(
            <(bool, i32, f32) as EventArgs>::KINDS,
            &[ValueKind::Bool, ValueKind::Int, ValueKind::Float]
        );
        assert_eq!(<() as EventArgs>::KINDS, &[]);
    }
}
