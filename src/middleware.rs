//! Request middleware applied between base encoding and dispatch.
//!
//! A [`MiddlewarePipeline`] is an explicit, ordered list of transformations. Each
//! middleware receives the already encoded [`ReqwestRequest`] plus a
//! [`RequestContext`] snapshot and returns the request to hand to the next stage.

pub mod query_signer;

pub use query_signer::*;

// self
use crate::{_prelude::*, auth::AccessToken};

/// Per-request state visible to middleware.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestContext<'a> {
	/// Access token read from the credential store when the request was prepared.
	pub access_token: Option<&'a AccessToken>,
}

/// Transformation applied to every outgoing request.
pub trait RequestMiddleware
where
	Self: Send + Sync,
{
	/// Stable label used in logs.
	fn name(&self) -> &'static str;

	/// Decorates `request`. Returning an error aborts the pipeline.
	fn apply(&self, request: ReqwestRequest, context: &RequestContext<'_>) -> Result<ReqwestRequest>;
}

/// Ordered list of middleware; stages run in insertion order.
#[derive(Clone, Default)]
pub struct MiddlewarePipeline(Vec<Arc<dyn RequestMiddleware>>);
impl MiddlewarePipeline {
	/// Creates an empty pipeline.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a stage.
	pub fn with(mut self, middleware: impl 'static + RequestMiddleware) -> Self {
		self.push(Arc::new(middleware));

		self
	}

	/// Appends a shared stage.
	pub fn push(&mut self, middleware: Arc<dyn RequestMiddleware>) {
		self.0.push(middleware);
	}

	/// Number of stages.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no stage is registered.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Stage names in execution order.
	pub fn names(&self) -> Vec<&'static str> {
		self.0.iter().map(|middleware| middleware.name()).collect()
	}

	/// Runs every stage in order, stopping at the first error.
	pub fn apply(
		&self,
		request: ReqwestRequest,
		context: &RequestContext<'_>,
	) -> Result<ReqwestRequest> {
		self.0.iter().try_fold(request, |request, middleware| middleware.apply(request, context))
	}
}
impl Debug for MiddlewarePipeline {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("MiddlewarePipeline").field(&self.names()).finish()
	}
}
