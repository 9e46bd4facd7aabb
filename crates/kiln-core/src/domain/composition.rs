//! Template data builder.
//!
//! Turns a [`GenerationRequest`] plus its [`DerivedIdentifiers`] into the
//! [`TemplateContext`] every template of that kind is rendered against.
//!
//! Each artifact kind has one composition rule (see `rule`). A rule reads the
//! request flags and derives the sub-structures its templates need (actions,
//! handlers, fields, mock entries). Lists are built in a fixed order because
//! that order becomes the order of the generated code.
//!
//! The builder is pure: no I/O, no clock, no randomness.

use crate::domain::{
    context::{ContextBuilder, Record, TemplateContext},
    error::DomainError,
    identifiers::{DerivedIdentifiers, lower_first},
    request::GenerationRequest,
    value_objects::ArtifactKind,
};

type ComposeFn = fn(&mut ContextBuilder, &Subject<'_>) -> Result<(), DomainError>;

/// Composition rule per artifact kind.
fn rule(kind: ArtifactKind) -> ComposeFn {
    match kind {
        ArtifactKind::Component => compose_component,
        ArtifactKind::Store => compose_store,
        ArtifactKind::Service => compose_service,
        ArtifactKind::Page => compose_page,
    }
}

/// Build the context for one generation request.
///
/// # Errors
///
/// - [`DomainError::UnsupportedOption`] for options the kind does not know
/// - [`DomainError::InvalidOptionValue`] for a flag given a string (or vice versa)
pub fn build_context(
    request: &GenerationRequest,
    ids: &DerivedIdentifiers,
) -> Result<TemplateContext, DomainError> {
    request.options.validate_for(request.kind)?;

    let subject = Subject {
        request,
        ids,
        entity_camel: lower_first(&ids.entity_name),
    };

    let mut ctx = TemplateContext::builder();
    compose_common(&mut ctx, &subject)?;

    rule(request.kind)(&mut ctx, &subject)?;

    Ok(ctx.build())
}

/// Inputs shared by every rule.
struct Subject<'a> {
    request: &'a GenerationRequest,
    ids: &'a DerivedIdentifiers,
    /// Entity in camel case (`orderItem`), used for variables and modules.
    entity_camel: String,
}

impl Subject<'_> {
    fn flag(&self, name: &str) -> Result<bool, DomainError> {
        self.request.options.flag(name)
    }

    fn entity(&self) -> &str {
        &self.ids.entity_name
    }
}

fn compose_common(ctx: &mut ContextBuilder, s: &Subject<'_>) -> Result<(), DomainError> {
    let kind = s.request.kind;
    let description = match s.request.options.text("description")? {
        Some(text) => text.to_string(),
        None => format!("{} {}", s.ids.title_text, kind.as_str()),
    };

    ctx.insert("kind", kind.as_str())
        .insert("entityName", s.ids.entity_name.as_str())
        .insert("entityCamel", s.entity_camel.as_str())
        .insert("pascalName", s.ids.pascal_name.as_str())
        .insert("camelName", s.ids.camel_name.as_str())
        .insert("kebabName", s.ids.kebab_name.as_str())
        .insert("titleText", s.ids.title_text.as_str())
        .insert("description", description);
    Ok(())
}

// ── component ────────────────────────────────────────────────────────────────

fn compose_component(ctx: &mut ContextBuilder, s: &Subject<'_>) -> Result<(), DomainError> {
    let props = vec![
        prop("title", "string"),
        prop("className", "string"),
        prop("children", "React.ReactNode"),
    ];

    ctx.insert("useAntd", s.flag("antd")?)
        .insert("useStyled", s.flag("styled")?)
        .insert("rootName", format!("{}Root", s.ids.pascal_name))
        .insert("props", props);
    Ok(())
}

fn prop(name: &str, ty: &str) -> Record {
    Record::new().field("name", name).field("type", ty)
}

// ── store ────────────────────────────────────────────────────────────────────

fn compose_store(ctx: &mut ContextBuilder, s: &Subject<'_>) -> Result<(), DomainError> {
    let entity = s.entity();
    let pascal = &s.ids.pascal_name;
    let collection = format!("{}List", s.entity_camel);

    let fields = vec![
        Record::new()
            .field("name", collection.as_str())
            .field("type", format!("{entity}[]"))
            .field("initial", "[]"),
        Record::new()
            .field("name", "loading")
            .field("type", "boolean")
            .field("initial", "false"),
        Record::new()
            .field("name", "error")
            .field("type", "string | null")
            .field("initial", "null"),
    ];

    let actions = crud_actions(entity)
        .into_iter()
        .map(|action| {
            Record::new()
                .field("name", action.name)
                .field("verb", action.verb)
                .field("method", action.method)
                .field("takesId", action.takes_id)
                .field("takesBody", action.takes_body)
        })
        .collect::<Vec<_>>();

    ctx.insert("hasApi", s.flag("api")?)
        .insert("typeName", entity)
        .insert("collectionName", collection.as_str())
        .insert("apiName", format!("{}Api", s.entity_camel))
        .insert("apiModule", format!("../api/{}Api", s.entity_camel))
        .insert("apiPath", format!("/api/{}", s.ids.kebab_name))
        .insert("storeFactory", format!("create{pascal}"))
        .insert("contextName", format!("{pascal}Context"))
        .insert("hookName", format!("use{pascal}"))
        .insert("fields", fields)
        .insert("actions", actions);
    Ok(())
}

// ── service ──────────────────────────────────────────────────────────────────

fn compose_service(ctx: &mut ContextBuilder, s: &Subject<'_>) -> Result<(), DomainError> {
    let base_path = format!("/api/{}", s.ids.kebab_name);

    let fields = vec![
        schema_field("id", "string", "z.string()"),
        schema_field("name", "string", "z.string().min(1)"),
        schema_field("createdAt", "string", "z.string().datetime()"),
    ];

    let methods = [
        ("list", "GET", false, false),
        ("get", "GET", true, false),
        ("create", "POST", false, true),
        ("update", "PUT", true, true),
        ("remove", "DELETE", true, false),
    ]
    .into_iter()
    .map(|(name, method, has_id, has_body)| {
        Record::new()
            .field("name", name)
            .field("method", method)
            .field("hasId", has_id)
            .field("hasBody", has_body)
    })
    .collect::<Vec<_>>();

    ctx.insert("useZod", s.flag("zod")?)
        .insert("typeName", s.entity())
        .insert("schemaName", format!("{}Schema", s.entity_camel))
        .insert("basePath", base_path)
        .insert("fields", fields)
        .insert("methods", methods);
    Ok(())
}

fn schema_field(name: &str, ty: &str, zod: &str) -> Record {
    Record::new()
        .field("name", name)
        .field("type", ty)
        .field("zod", zod)
}

// ── page ─────────────────────────────────────────────────────────────────────

fn compose_page(ctx: &mut ContextBuilder, s: &Subject<'_>) -> Result<(), DomainError> {
    let entity = s.entity();
    let has_store = s.flag("store")?;
    let has_service = s.flag("service")?;
    let collection = format!("{}List", s.entity_camel);

    let mut actions = Vec::new();
    let mut handlers = Vec::new();
    let mut store_actions = Vec::new();
    let mut mock_store = Vec::new();

    if has_store {
        let add_handler = format!("handleAdd{entity}");
        actions.push(
            Record::new()
                .field("text", format!("Add {entity}"))
                .field("handler", add_handler.as_str()),
        );
        handlers.push(
            Record::new()
                .field("name", add_handler)
                .field("call", format!("create{entity}")),
        );

        for (key, value) in [
            (collection.as_str(), "[]"),
            ("loading", "false"),
            ("error", "null"),
        ] {
            mock_store.push(mock_entry(key, value, false));
        }
        for action in crud_actions(entity) {
            store_actions.push(Record::new().field("name", action.name.as_str()));
            mock_store.push(mock_entry(&action.name, "jest.fn()", true));
        }
    }

    ctx.insert("hasStore", has_store)
        .insert("hasService", has_service)
        .insert("hasLoading", has_store)
        .insert("hasError", has_store)
        .insert("hasActions", !actions.is_empty())
        .insert("actions", actions)
        .insert("handlers", handlers)
        .insert("storeActions", store_actions)
        .insert("mockStore", mock_store)
        .insert("collectionName", collection)
        .insert("storeName", format!("{}Store", s.entity_camel))
        .insert("storeHook", format!("use{entity}Store"))
        .insert("storeModule", format!("@/stores/{entity}Store"))
        .insert("serviceName", format!("{}Service", s.entity_camel))
        .insert("serviceModule", format!("@/services/{entity}Service"))
        .insert("routePath", format!("/{}", s.ids.kebab_name));
    Ok(())
}

fn mock_entry(key: &str, value: &str, is_action: bool) -> Record {
    Record::new()
        .field("key", key)
        .field("value", value)
        .field("isAction", is_action)
}

// ── shared ───────────────────────────────────────────────────────────────────

struct CrudAction {
    name: String,
    verb: &'static str,
    method: &'static str,
    takes_id: bool,
    takes_body: bool,
}

/// The four CRUD actions, in their canonical order.
fn crud_actions(entity: &str) -> [CrudAction; 4] {
    [
        CrudAction {
            name: format!("fetch{entity}List"),
            verb: "fetchList",
            method: "GET",
            takes_id: false,
            takes_body: false,
        },
        CrudAction {
            name: format!("create{entity}"),
            verb: "create",
            method: "POST",
            takes_id: false,
            takes_body: true,
        },
        CrudAction {
            name: format!("update{entity}"),
            verb: "update",
            method: "PUT",
            takes_id: true,
            takes_body: true,
        },
        CrudAction {
            name: format!("delete{entity}"),
            verb: "delete",
            method: "DELETE",
            takes_id: true,
            takes_body: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{context::Value, identifiers::derive};

    fn context_for(request: &GenerationRequest) -> TemplateContext {
        let ids = derive(&request.base_name, request.kind).unwrap();
        build_context(request, &ids).unwrap()
    }

    fn names(records: &[Record], field: &str) -> Vec<String> {
        records
            .iter()
            .map(|r| r.text(field).unwrap().to_string())
            .collect()
    }

    #[test]
    fn page_with_store_synthesizes_add_action_and_mock_store() {
        let request = GenerationRequest::new("Invoice", ArtifactKind::Page, ".")
            .with_option("store", true);
        let ctx = context_for(&request);

        let actions = ctx.list("actions").unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].text("text"), Some("Add Invoice"));

        assert_eq!(ctx.flag("hasLoading"), Some(true));
        assert_eq!(ctx.flag("hasError"), Some(true));
        assert_eq!(ctx.flag("hasActions"), Some(true));

        let mock_actions: Vec<_> = ctx
            .list("mockStore")
            .unwrap()
            .iter()
            .filter(|r| r.get("isAction") == Some(&Value::Bool(true)))
            .map(|r| r.text("key").unwrap().to_string())
            .collect();
        assert_eq!(
            mock_actions,
            [
                "fetchInvoiceList",
                "createInvoice",
                "updateInvoice",
                "deleteInvoice"
            ]
        );
        assert_eq!(
            names(ctx.list("storeActions").unwrap(), "name"),
            mock_actions
        );
    }

    #[test]
    fn page_without_store_has_empty_collections() {
        let request = GenerationRequest::new("Invoice", ArtifactKind::Page, ".");
        let ctx = context_for(&request);

        assert_eq!(ctx.flag("hasStore"), Some(false));
        assert_eq!(ctx.flag("hasActions"), Some(false));
        assert!(ctx.list("actions").unwrap().is_empty());
        assert!(ctx.list("mockStore").unwrap().is_empty());
        assert_eq!(ctx.text("routePath"), Some("/invoice"));
    }

    #[test]
    fn default_description_is_synthesized() {
        let request = GenerationRequest::new("orderItem", ArtifactKind::Component, ".");
        let ctx = context_for(&request);
        assert_eq!(ctx.text("description"), Some("Order Item component"));

        let request = request.with_option("description", "Line of an order");
        assert_eq!(
            context_for(&request).text("description"),
            Some("Line of an order")
        );
    }

    #[test]
    fn store_actions_follow_crud_order() {
        let request =
            GenerationRequest::new("Invoice", ArtifactKind::Store, ".").with_option("api", true);
        let ctx = context_for(&request);

        assert_eq!(ctx.flag("hasApi"), Some(true));
        assert_eq!(ctx.text("hookName"), Some("useInvoiceStore"));
        assert_eq!(
            names(ctx.list("actions").unwrap(), "name"),
            [
                "fetchInvoiceList",
                "createInvoice",
                "updateInvoice",
                "deleteInvoice"
            ]
        );
        assert_eq!(
            names(ctx.list("fields").unwrap(), "name"),
            ["invoiceList", "loading", "error"]
        );
    }

    #[test]
    fn service_exposes_zod_schema() {
        let request =
            GenerationRequest::new("OrderItem", ArtifactKind::Service, ".").with_option("zod", true);
        let ctx = context_for(&request);

        assert_eq!(ctx.flag("useZod"), Some(true));
        assert_eq!(ctx.text("schemaName"), Some("orderItemSchema"));
        assert_eq!(ctx.text("basePath"), Some("/api/order-item"));
        assert_eq!(
            names(ctx.list("methods").unwrap(), "name"),
            ["list", "get", "create", "update", "remove"]
        );
    }

    #[test]
    fn component_flags_default_to_false() {
        let request = GenerationRequest::new("Button", ArtifactKind::Component, ".");
        let ctx = context_for(&request);
        assert_eq!(ctx.flag("useAntd"), Some(false));
        assert_eq!(ctx.flag("useStyled"), Some(false));
        assert_eq!(ctx.text("rootName"), Some("ButtonRoot"));
    }

    #[test]
    fn every_kind_gets_its_own_rule() {
        let own_key = |kind| match kind {
            ArtifactKind::Component => "rootName",
            ArtifactKind::Store => "storeFactory",
            ArtifactKind::Service => "schemaName",
            ArtifactKind::Page => "routePath",
        };
        for kind in ArtifactKind::ALL {
            let ctx = context_for(&GenerationRequest::new("Invoice", kind, "."));
            assert!(ctx.get(own_key(kind)).is_some(), "{kind} missing {}", own_key(kind));
            assert_eq!(ctx.text("kind"), Some(kind.as_str()));
        }
    }

    #[test]
    fn building_twice_is_deterministic() {
        let request = GenerationRequest::new("Invoice", ArtifactKind::Page, ".")
            .with_option("store", true)
            .with_option("service", true);
        assert_eq!(context_for(&request), context_for(&request));
    }

    #[test]
    fn foreign_option_is_rejected() {
        let request =
            GenerationRequest::new("Invoice", ArtifactKind::Page, ".").with_option("antd", true);
        let ids = derive("Invoice", ArtifactKind::Page).unwrap();
        assert!(matches!(
            build_context(&request, &ids),
            Err(DomainError::UnsupportedOption { .. })
        ));
    }
}
