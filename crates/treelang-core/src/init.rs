//! Implicit initializer synthesis.
//!
//! Var defaults that need runtime evaluation (and verb registrations) are
//! queued on the class as [`InitExpr`](crate::expr::InitExpr)s. Before the
//! user's `New()` runs, the runtime calls the class's initializer proc, which
//! first calls the parent's initializer and then evaluates the queue in
//! declaration order. Field defaults therefore run base class first.

use petgraph::visit::Bfs;

use crate::error::CoreError;
use crate::id::{ClassId, ProcId};
use crate::proc::{ProcAttributes, ProcStep};
use crate::tree::ObjectTree;

impl ObjectTree {
    /// Builds the implicit initializer proc for `class`, if it needs one.
    ///
    /// Does nothing when the class has no pending expressions or already has
    /// an initializer, so calling it again is a no-op. Returns the class's
    /// initializer id after the call.
    pub fn create_initializer(&mut self, class: ClassId) -> Result<Option<ProcId>, CoreError> {
        let node = self.try_class(class)?;
        if node.init_exprs.is_empty() || node.init_proc.is_some() {
            return Ok(node.init_proc);
        }

        let exprs = node.init_exprs.clone();
        let path = node.path.clone();

        let id = self
            .procs
            .register(class, None, ProcAttributes::default(), None);
        let proc = self
            .procs
            .get_mut(id)
            .ok_or(CoreError::ProcNotFound { id })?;
        proc.push_step(ProcStep::CallSuper { arg_count: 0 });
        for init in exprs {
            proc.push_step(ProcStep::DebugSource(init.location));
            proc.push_step(ProcStep::Eval(init.expr));
        }
        let step_count = proc.body.len();

        self.class_mut(class)?.init_proc = Some(id);
        tracing::debug!(class = %path, proc = id.0, steps = step_count, "synthesized initializer");
        Ok(Some(id))
    }

    /// Synthesizes initializers for every class, parents before children.
    ///
    /// Call once all declarations for the compilation have been added.
    pub fn finalize(&mut self) -> Result<(), CoreError> {
        let mut order = Vec::with_capacity(self.class_count());
        let mut bfs = Bfs::new(self.graph(), ClassId::ROOT.into());
        while let Some(idx) = bfs.next(self.graph()) {
            order.push(ClassId::from(idx));
        }

        for class in order {
            self.create_initializer(class)?;
        }
        Ok(())
    }
}
