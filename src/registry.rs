use crate::command::PromptHandler;
use crate::path::{BasePrefix, CommandPath, HandlerIdentity, normalize};

struct Registration {
    identity: HandlerIdentity,
    handler: Box<dyn PromptHandler>,
}

/// Ordered set of prompt handlers known to a session.
///
/// The host builds the registry explicitly; enumeration follows registration order, which
/// is also the order in which [`resolve`](Self::resolve) tries candidates.
///
/// ```
/// use prompt_framework::{
///     BasePrefix, CommandPath, HandlerIdentity, HandlerRegistry, PromptHandler, SessionState,
/// };
///
/// struct Hello;
///
/// impl PromptHandler for Hello {
///     fn handle_prompt(
///         &self,
///         _path: &[String],
///         _args: &[String],
///         _state: &mut SessionState,
///     ) -> anyhow::Result<()> {
///         println!("hello");
///         Ok(())
///     }
/// }
///
/// let registry = HandlerRegistry::new()
///     .with_as(HandlerIdentity::new("Greet", "Hello"), Hello);
/// let path = CommandPath::from_tokens(&["greet", "hello"]);
/// assert!(registry.resolve(&path, &BasePrefix::default()).is_some());
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Registration>,
}

impl HandlerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under the identity derived from its type name.
    pub fn register<H: PromptHandler + 'static>(&mut self, handler: H) -> &mut Self {
        self.register_as(HandlerIdentity::of::<H>(), handler)
    }

    /// Register a handler under an explicitly declared identity.
    pub fn register_as<H: PromptHandler + 'static>(
        &mut self,
        identity: HandlerIdentity,
        handler: H,
    ) -> &mut Self {
        self.handlers.push(Registration {
            identity,
            handler: Box::new(handler),
        });
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<H: PromptHandler + 'static>(mut self, handler: H) -> Self {
        self.register(handler);
        self
    }

    /// Builder form of [`register_as`](Self::register_as).
    pub fn with_as<H: PromptHandler + 'static>(
        mut self,
        identity: HandlerIdentity,
        handler: H,
    ) -> Self {
        self.register_as(identity, handler);
        self
    }

    /// Handlers with their identities, in registration order.
    pub fn enumerate(&self) -> impl Iterator<Item = (&dyn PromptHandler, &HandlerIdentity)> {
        self.handlers
            .iter()
            .map(|r| (r.handler.as_ref(), &r.identity))
    }

    /// Canonical paths of all handlers, in registration order.
    pub fn paths(&self, base_prefix: &BasePrefix) -> Vec<CommandPath> {
        self.handlers
            .iter()
            .map(|r| normalize(&r.identity, base_prefix))
            .collect()
    }

    /// First handler whose canonical path equals `path`.
    ///
    /// Only exact matches count: `note` never resolves to a `note create` handler.
    pub fn resolve(
        &self,
        path: &CommandPath,
        base_prefix: &BasePrefix,
    ) -> Option<&dyn PromptHandler> {
        self.handlers.iter().find_map(|r| {
            let candidate = normalize(&r.identity, base_prefix);
            tracing::debug!(handler = %r.identity, candidate = %candidate, "checking handler");
            (candidate == *path).then_some(r.handler.as_ref())
        })
    }

    /// Identities that can never be reached because an earlier handler claims the same path.
    pub fn shadowed(
        &self,
        base_prefix: &BasePrefix,
    ) -> Vec<(&HandlerIdentity, &HandlerIdentity)> {
        let paths = self.paths(base_prefix);
        let mut out = Vec::new();
        for (i, path) in paths.iter().enumerate() {
            if let Some(first) = paths[..i].iter().position(|p| p == path) {
                out.push((&self.handlers[i].identity, &self.handlers[first].identity));
            }
        }
        out
    }

    /// Number of registered handlers, shadowed ones included.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
