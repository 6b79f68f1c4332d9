use std::fmt::Display;

use serde_json::Value;

use crate::client::Request;
use crate::resource::{Descriptor, PageRequest, Tag};

/// Request plus its caching contract.
#[derive(Debug, Clone)]
pub struct Endpoint {
    request: Request,
    provides: Vec<Tag>,
    invalidates: Vec<Tag>,
}

impl Endpoint {
    pub fn query(request: Request) -> Self {
        Self {
            request,
            provides: Vec::new(),
            invalidates: Vec::new(),
        }
    }

    pub fn mutation(request: Request) -> Self {
        Endpoint::query(request)
    }

    /// Tag the cached response with `tag`.
    pub fn provides(mut self, tag: Tag) -> Self {
        self.provides.push(tag);
        self
    }

    /// Drop cached responses matching `tag` once the call succeeds.
    pub fn invalidates(mut self, tag: Tag) -> Self {
        self.invalidates.push(tag);
        self
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn provided_tags(&self) -> &[Tag] {
        &self.provides
    }

    pub fn invalidated_tags(&self) -> &[Tag] {
        &self.invalidates
    }

    pub(crate) fn into_parts(self) -> (Request, Vec<Tag>, Vec<Tag>) {
        (self.request, self.provides, self.invalidates)
    }

    pub fn list(resource: &Descriptor) -> Self {
        Endpoint::query(Request::get(resource.path)).provides(Tag::list(resource.kind))
    }

    pub fn page(resource: &Descriptor, page: &PageRequest) -> Self {
        let request = page.apply(Request::get(resource.sub_path("page")), resource);
        Endpoint::query(request).provides(Tag::list(resource.kind))
    }

    pub fn search(resource: &Descriptor, term: &str) -> Self {
        let request = Request::get(resource.sub_path("search")).query("searchTerm", term);
        Endpoint::query(request).provides(Tag::list(resource.kind))
    }

    pub fn get(resource: &Descriptor, id: impl Display) -> Self {
        let tag = Tag::id(resource.kind, &id);
        Endpoint::query(Request::get(resource.item_path(id))).provides(tag)
    }

    pub fn create(resource: &Descriptor, body: Value) -> Self {
        Endpoint::mutation(Request::post(resource.path).json_body(body))
            .invalidates(Tag::list(resource.kind))
    }

    pub fn update(resource: &Descriptor, id: impl Display, body: Value) -> Self {
        let tag = Tag::id(resource.kind, &id);
        Endpoint::mutation(Request::put(resource.item_path(id)).json_body(body)).invalidates(tag)
    }

    pub fn delete(resource: &Descriptor, id: impl Display) -> Self {
        let tag = Tag::id(resource.kind, &id);
        Endpoint::mutation(Request::delete(resource.item_path(id))).invalidates(tag)
    }
}
