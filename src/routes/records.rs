use crate::{ResourceContext, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Record Router Module
///
/// Binds the five controller operations for one resource collection under
/// the given prefix. The same builder serves both collections; only the
/// schema and store inside the `ResourceContext` differ, which is what keeps
/// the two resources from being duplicated code paths.
///
/// Update is reachable through both PATCH and PUT with identical merge
/// semantics, so clients that differ on the verb see the same behavior.
pub fn record_routes(prefix: &str, ctx: ResourceContext) -> Router {
    let collection = prefix.to_string();
    let member = format!("{prefix}/{{id}}");

    Router::new()
        // POST /<resource>         create
        // GET  /<resource>         list (empty collection is a 200, not an error)
        .route(
            &collection,
            post(handlers::create_record).get(handlers::list_records),
        )
        // GET    /<resource>/{id}  read one
        // PATCH  /<resource>/{id}  partial update (merge)
        // PUT    /<resource>/{id}  same update operation, alternate verb
        // DELETE /<resource>/{id}  delete, returns the removed record
        .route(
            &member,
            get(handlers::get_record)
                .patch(handlers::update_record)
                .put(handlers::update_record)
                .delete(handlers::delete_record),
        )
        .with_state(ctx)
}
