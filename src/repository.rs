//! Typed facade over the engine for one record type
//!
//! ```ignore
//! let ctx = OrmContext::new(&store, &config, now);
//! let posts = ctx.repository::<Post>();
//!
//! posts.create_table()?;
//! let mut post = Post::create();
//! post.record_mut().set("title", "Hello");
//! posts.save(&mut post, None)?;
//! let recent = posts.find("views > 10", &FetchOptions::new().limit(5))?;
//! ```

use std::marker::PhantomData;

use serde_json::Value;

use crate::condition::Conditions;
use crate::context::OrmContext;
use crate::ddl;
use crate::errors::OrmResult;
use crate::query::{self, FetchOptions};
use crate::record::Model;
use crate::writer::{self, SaveAction, WriteResult};

/// Engine operations for record type `M`
pub struct Repository<'a, M: Model> {
    ctx: OrmContext<'a>,
    _model: PhantomData<fn() -> M>,
}

impl<'a, M: Model> Repository<'a, M> {
    pub fn new(ctx: OrmContext<'a>) -> Self {
        Self {
            ctx,
            _model: PhantomData,
        }
    }

    pub fn context(&self) -> &OrmContext<'a> {
        &self.ctx
    }

    /// Records matching `conditions`; `None` when nothing matched
    pub fn find(
        &self,
        conditions: impl Into<Conditions>,
        options: &FetchOptions,
    ) -> OrmResult<Option<Vec<M>>> {
        let found = query::find(&self.ctx, &M::schema(), conditions, options)?;
        Ok(found.map(|records| records.into_iter().map(M::from_record).collect()))
    }

    pub fn find_all(&self, options: &FetchOptions) -> OrmResult<Option<Vec<M>>> {
        let found = query::find_all(&self.ctx, &M::schema(), options)?;
        Ok(found.map(|records| records.into_iter().map(M::from_record).collect()))
    }

    pub fn find_by_pk(&self, value: impl Into<Value>) -> OrmResult<Option<M>> {
        let found = query::find_by_pk(&self.ctx, &M::schema(), value)?;
        Ok(found.map(M::from_record))
    }

    /// Reload `model` from the store; false if it has no key or no row
    pub fn load(&self, model: &mut M) -> OrmResult<bool> {
        query::load(&self.ctx, model.record_mut())
    }

    pub fn save(&self, model: &mut M, action: Option<SaveAction>) -> OrmResult<WriteResult> {
        writer::save(&self.ctx, model.record_mut(), action)
    }

    pub fn insert(&self, model: &mut M) -> OrmResult<bool> {
        writer::insert(&self.ctx, model.record_mut())
    }

    pub fn update(&self, model: &mut M) -> OrmResult<bool> {
        writer::update(&self.ctx, model.record_mut())
    }

    /// Delete matching rows; conditions that compile to nothing delete nothing
    pub fn delete(&self, conditions: impl Into<Conditions>) -> OrmResult<usize> {
        writer::delete(&self.ctx, &M::schema(), conditions)
    }

    pub fn create_table(&self) -> OrmResult<()> {
        ddl::create_table(&self.ctx, &M::schema())
    }

    pub fn drop_table(&self) -> OrmResult<()> {
        ddl::drop_table(&self.ctx, &M::schema())
    }
}
