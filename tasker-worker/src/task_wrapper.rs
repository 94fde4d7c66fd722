//! `TaskWrapper`: a registered task's callable, declared signature and
//! hooks.
//!
//! The original introspected a Python callable's signature at registration
//! time (`inspect.signature`). Rust closures carry no such metadata, so
//! callers declare a [`ParamSpec`] alongside the callable instead — the
//! approach the distilled spec's own design notes anticipated for this
//! exact gap. Everything downstream (`validate`, `run`) is otherwise a
//! direct port of `Tasker.TaskWrapper`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::{Map, Value};
use tasker_shared::OrchestratorError;

/// A value a task body returns or an error message string, boxed so it can
/// cross an `Arc<dyn Fn>` call.
pub type TaskOutcome = Result<Value, String>;
pub type TaskFuture = Pin<Box<dyn Future<Output = TaskOutcome> + Send>>;
pub type HookFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;

/// A registered task body. Takes owned args/kwargs (not borrowed) so the
/// boxed future has no lifetime tied to the caller's stack frame.
pub type TaskCallable = Arc<dyn Fn(Vec<Value>, Map<String, Value>) -> TaskFuture + Send + Sync>;

/// A pre- or post-execution hook. `result` is `None` for the pre-hook call
/// and `Some(value)` for the post-hook call, matching
/// `pre(name, args, kwargs, None)` / `post(name, args, kwargs, result)`.
pub type HookCallable =
    Arc<dyn Fn(String, Vec<Value>, Map<String, Value>, Option<Value>) -> HookFuture + Send + Sync>;

/// The runtime type a declared parameter accepts, checked by strict JSON
/// value-kind equality — the Rust analogue of `type(x) == declared`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Number,
    Bool,
    Array,
    Object,
}

impl ParamType {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Bool => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

/// One parameter descriptor, declared by the task author at registration
/// time in lieu of signature introspection.
#[derive(Debug, Clone)]
pub struct TaskParam {
    pub name: String,
    pub positional_only: bool,
    pub keyword_only: bool,
    pub has_default: bool,
    pub declared_type: Option<ParamType>,
}

impl TaskParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            positional_only: false,
            keyword_only: false,
            has_default: false,
            declared_type: None,
        }
    }

    pub fn positional_only(mut self) -> Self {
        self.positional_only = true;
        self
    }

    pub fn keyword_only(mut self) -> Self {
        self.keyword_only = true;
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn typed(mut self, ty: ParamType) -> Self {
        self.declared_type = Some(ty);
        self
    }
}

/// A task's declared parameter list, standing in for an introspected
/// signature.
#[derive(Debug, Clone, Default)]
pub struct ParamSpec {
    pub params: Vec<TaskParam>,
    /// Mirrors a `**kwargs` collector in the original signature: when set,
    /// unrecognized keyword names are accepted rather than rejected.
    pub accepts_arbitrary_kwargs: bool,
}

impl ParamSpec {
    pub fn new(params: Vec<TaskParam>) -> Self {
        Self {
            params,
            accepts_arbitrary_kwargs: false,
        }
    }

    pub fn with_arbitrary_kwargs(mut self) -> Self {
        self.accepts_arbitrary_kwargs = true;
        self
    }

    /// Implements the five validation rules from the component design.
    /// Returns `Ok(())` iff every rule passes.
    pub fn validate(&self, args: &[Value], kwargs: &Map<String, Value>) -> Result<(), OrchestratorError> {
        for (index, param) in self.params.iter().enumerate() {
            let by_position = args.get(index);
            let by_name = kwargs.get(&param.name);

            if param.keyword_only && !param.has_default && by_name.is_none() {
                return Err(OrchestratorError::InvalidTaskArguments(format!(
                    "missing required keyword argument '{}'",
                    param.name
                )));
            }

            if param.positional_only && !param.has_default && index >= args.len() {
                return Err(OrchestratorError::InvalidTaskArguments(format!(
                    "missing required positional argument '{}'",
                    param.name
                )));
            }

            if !param.has_default
                && !param.keyword_only
                && !param.positional_only
                && by_position.is_none()
                && by_name.is_none()
            {
                return Err(OrchestratorError::InvalidTaskArguments(format!(
                    "missing required argument '{}'",
                    param.name
                )));
            }

            if let Some(declared) = param.declared_type {
                if let Some(value) = by_position.or(by_name) {
                    if !declared.matches(value) {
                        return Err(OrchestratorError::InvalidTaskArguments(format!(
                            "argument '{}' does not match declared type",
                            param.name
                        )));
                    }
                }
            }
        }

        if !self.accepts_arbitrary_kwargs {
            for name in kwargs.keys() {
                if !self.params.iter().any(|p| &p.name == name) {
                    return Err(OrchestratorError::InvalidTaskArguments(format!(
                        "unexpected keyword argument '{name}'"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// A registered task: its callable, declared parameters, and optional
/// pre/post hooks.
#[derive(Clone)]
pub struct TaskWrapper {
    pub name: String,
    pub callable: TaskCallable,
    pub spec: ParamSpec,
    pub pre: Option<HookCallable>,
    pub post: Option<HookCallable>,
}

impl std::fmt::Debug for TaskWrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskWrapper")
            .field("name", &self.name)
            .field("params", &self.spec.params.len())
            .field("has_pre", &self.pre.is_some())
            .field("has_post", &self.post.is_some())
            .finish()
    }
}

impl TaskWrapper {
    pub fn new(name: impl Into<String>, callable: TaskCallable, spec: ParamSpec) -> Self {
        Self {
            name: name.into(),
            callable,
            spec,
            pre: None,
            post: None,
        }
    }

    pub fn validate(&self, args: &[Value], kwargs: &Map<String, Value>) -> Result<(), OrchestratorError> {
        self.spec.validate(args, kwargs)
    }

    /// Runs the execution protocol: pre-hook, callable, post-hook. A
    /// failure at any step aborts the remaining steps and propagates.
    pub async fn run(&self, args: Vec<Value>, kwargs: Map<String, Value>) -> Result<Value, String> {
        if let Some(pre) = &self.pre {
            pre(self.name.clone(), args.clone(), kwargs.clone(), None).await?;
        }

        let result = (self.callable)(args.clone(), kwargs.clone()).await?;

        if let Some(post) = &self.post {
            post(self.name.clone(), args, kwargs, Some(result.clone())).await?;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo_spec() -> ParamSpec {
        ParamSpec::new(vec![
            TaskParam::new("message").typed(ParamType::String),
            TaskParam::new("loud").with_default().typed(ParamType::Bool),
        ])
    }

    #[test]
    fn validate_accepts_defaulted_param_when_absent() {
        let spec = echo_spec();
        let mut kwargs = Map::new();
        kwargs.insert("message".into(), json!("hi"));
        assert!(spec.validate(&[], &kwargs).is_ok());
    }

    #[test]
    fn validate_rejects_missing_required_param() {
        let spec = echo_spec();
        assert!(spec.validate(&[], &Map::new()).is_err());
    }

    #[test]
    fn validate_rejects_type_mismatch() {
        let spec = echo_spec();
        let mut kwargs = Map::new();
        kwargs.insert("message".into(), json!(42));
        assert!(spec.validate(&[], &kwargs).is_err());
    }

    #[test]
    fn validate_rejects_unexpected_keyword() {
        let spec = echo_spec();
        let mut kwargs = Map::new();
        kwargs.insert("message".into(), json!("hi"));
        kwargs.insert("extra".into(), json!(1));
        assert!(spec.validate(&[], &kwargs).is_err());
    }

    #[test]
    fn arbitrary_kwargs_suppresses_unexpected_keyword_check() {
        let spec = echo_spec().with_arbitrary_kwargs();
        let mut kwargs = Map::new();
        kwargs.insert("message".into(), json!("hi"));
        kwargs.insert("extra".into(), json!(1));
        assert!(spec.validate(&[], &kwargs).is_ok());
    }

    #[test]
    fn validate_rejects_missing_positional_only() {
        let spec = ParamSpec::new(vec![TaskParam::new("x").positional_only()]);
        assert!(spec.validate(&[], &Map::new()).is_err());
        assert!(spec.validate(&[json!(1)], &Map::new()).is_ok());
    }

    #[test]
    fn validate_rejects_missing_keyword_only() {
        let spec = ParamSpec::new(vec![TaskParam::new("x").keyword_only()]);
        assert!(spec.validate(&[json!(1)], &Map::new()).is_err());
        let mut kwargs = Map::new();
        kwargs.insert("x".into(), json!(1));
        assert!(spec.validate(&[], &kwargs).is_ok());
    }

    #[tokio::test]
    async fn run_invokes_pre_callable_post_in_order() {
        use std::sync::atomic::{AtomicU8, Ordering};
        let order = Arc::new(AtomicU8::new(0));

        let pre_order = order.clone();
        let post_order = order.clone();

        let wrapper = TaskWrapper {
            name: "noop".into(),
            callable: Arc::new(|_args, _kwargs| {
                Box::pin(async move { Ok(json!("done")) })
            }),
            spec: ParamSpec::default(),
            pre: Some(Arc::new(move |_, _, _, _| {
                let order = pre_order.clone();
                Box::pin(async move {
                    order.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
            })),
            post: Some(Arc::new(move |_, _, _, _| {
                let order = post_order.clone();
                Box::pin(async move {
                    assert_eq!(order.fetch_add(1, Ordering::SeqCst), 1);
                    Ok(())
                })
            })),
        };

        let result = wrapper.run(vec![], Map::new()).await.unwrap();
        assert_eq!(result, json!("done"));
        assert_eq!(order.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn run_propagates_callable_error() {
        let wrapper = TaskWrapper::new(
            "boom",
            Arc::new(|_args, _kwargs| Box::pin(async move { Err("kaboom".to_string()) })),
            ParamSpec::default(),
        );
        let err = wrapper.run(vec![], Map::new()).await.unwrap_err();
        assert_eq!(err, "kaboom");
    }
}
