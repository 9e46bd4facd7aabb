//! Block template renderer.

use std::borrow::Cow;

use kiln_core::{
    application::ports::TemplateRenderer,
    domain::{Record, TemplateContext, TemplateError, Value},
};
use tracing::{instrument, trace};

use super::syntax::{BlockKind, Node, parse};

/// How `{{name}}` substitutions are escaped. `{{{name}}}` is never escaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EscapeMode {
    /// Values are inserted verbatim. Generated files are source code.
    #[default]
    Raw,
    /// `& < > " '` become HTML entities.
    Html,
}

/// Renderer for the `{{…}}` block syntax described in [`super::syntax`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockRenderer {
    escape: EscapeMode,
}

impl BlockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_escape(escape: EscapeMode) -> Self {
        Self { escape }
    }

    pub fn escape_mode(&self) -> EscapeMode {
        self.escape
    }
}

impl TemplateRenderer for BlockRenderer {
    #[instrument(skip_all, fields(len = source.len()))]
    fn render(&self, source: &str, context: &TemplateContext) -> Result<String, TemplateError> {
        let nodes = parse(source)?;
        check_names(&nodes, &[NameScope::Root(context)])?;
        let mut out = String::with_capacity(source.len());
        let scopes = vec![Scope::Root(context)];
        self.render_nodes(&nodes, &scopes, &mut out)?;
        trace!(bytes = out.len(), "Rendered template");
        Ok(out)
    }
}

/// One level of name resolution; the innermost scope is last.
#[derive(Clone, Copy)]
enum Scope<'a> {
    Root(&'a TemplateContext),
    Item {
        record: &'a Record,
        index: usize,
        count: usize,
    },
}

impl<'a> Scope<'a> {
    fn lookup(&self, name: &str) -> Option<Cow<'a, Value>> {
        match self {
            Self::Root(ctx) => ctx.get(name).map(Cow::Borrowed),
            Self::Item {
                record,
                index,
                count,
            } => match name {
                "@index" => Some(Cow::Owned(Value::Text(index.to_string()))),
                "@first" => Some(Cow::Owned(Value::Bool(*index == 0))),
                "@last" => Some(Cow::Owned(Value::Bool(index + 1 == *count))),
                _ => record.get(name).map(Cow::Borrowed),
            },
        }
    }
}

fn resolve<'a>(
    scopes: &[Scope<'a>],
    name: &str,
    line: usize,
) -> Result<Cow<'a, Value>, TemplateError> {
    scopes
        .iter()
        .rev()
        .find_map(|scope| scope.lookup(name))
        .ok_or_else(|| TemplateError::MissingVariable {
            name: name.to_string(),
            line,
        })
}

const MARKERS: [&str; 3] = ["@index", "@first", "@last"];

/// What is known about a name before rendering.
enum Shape<'a> {
    Scalar,
    /// Records of the list, gathered across every enclosing item.
    List(Vec<&'a Record>),
    /// Inside `#each` over an empty list; its fields cannot be known.
    Open,
}

/// Static counterpart of [`Scope`] covering every item at once.
#[derive(Clone)]
enum NameScope<'a> {
    Root(&'a TemplateContext),
    Items(Vec<&'a Record>),
}

impl<'a> NameScope<'a> {
    fn lookup(&self, name: &str) -> Option<Shape<'a>> {
        match self {
            Self::Root(ctx) => ctx.get(name).map(shape_of),
            Self::Items(records) if records.is_empty() => Some(Shape::Open),
            Self::Items(_) if MARKERS.contains(&name) => Some(Shape::Scalar),
            Self::Items(records) => {
                let values: Vec<&'a Value> =
                    records.iter().copied().filter_map(|r| r.get(name)).collect();
                if values.is_empty() {
                    return None;
                }
                let mut nested = Vec::new();
                let mut is_list = false;
                for value in values {
                    if let Value::List(items) = value {
                        is_list = true;
                        nested.extend(items.iter());
                    }
                }
                Some(if is_list { Shape::List(nested) } else { Shape::Scalar })
            }
        }
    }
}

fn shape_of(value: &Value) -> Shape<'_> {
    match value {
        Value::List(items) => Shape::List(items.iter().collect()),
        _ => Shape::Scalar,
    }
}

/// Resolve every name in every branch, taken or not, so a typo in an
/// `{{else}}` arm fails now rather than when a flag flips.
fn check_names(nodes: &[Node], scopes: &[NameScope<'_>]) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Var { name, line, .. } => {
                resolve_name(scopes, name, *line)?;
            }
            Node::Block {
                kind,
                name,
                body,
                otherwise,
                line,
            } => {
                let shape = resolve_name(scopes, name, *line)?;
                if *kind == BlockKind::Each {
                    let records = match shape {
                        Shape::List(records) => records,
                        Shape::Scalar | Shape::Open => Vec::new(),
                    };
                    let mut inner = scopes.to_vec();
                    inner.push(NameScope::Items(records));
                    check_names(body, &inner)?;
                } else {
                    check_names(body, scopes)?;
                }
                check_names(otherwise, scopes)?;
            }
        }
    }
    Ok(())
}

fn resolve_name<'a>(
    scopes: &[NameScope<'a>],
    name: &str,
    line: usize,
) -> Result<Shape<'a>, TemplateError> {
    scopes
        .iter()
        .rev()
        .find_map(|scope| scope.lookup(name))
        .ok_or_else(|| TemplateError::MissingVariable {
            name: name.to_string(),
            line,
        })
}

impl BlockRenderer {
    fn render_nodes(
        &self,
        nodes: &[Node],
        scopes: &[Scope<'_>],
        out: &mut String,
    ) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Var { name, raw, line } => {
                    let value = resolve(scopes, name, *line)?;
                    let text = display(&value, name, *line)?;
                    if *raw || self.escape == EscapeMode::Raw {
                        out.push_str(&text);
                    } else {
                        out.push_str(&escape_html(&text));
                    }
                }
                Node::Block {
                    kind,
                    name,
                    body,
                    otherwise,
                    line,
                } => {
                    let value = resolve(scopes, name, *line)?;
                    match kind {
                        BlockKind::If | BlockKind::Unless => {
                            let truthy = value.is_truthy() == (*kind == BlockKind::If);
                            let branch = if truthy { body } else { otherwise };
                            self.render_nodes(branch, scopes, out)?;
                        }
                        BlockKind::Each => {
                            self.render_each(&value, name, *line, body, otherwise, scopes, out)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn render_each(
        &self,
        value: &Value,
        name: &str,
        line: usize,
        body: &[Node],
        otherwise: &[Node],
        scopes: &[Scope<'_>],
        out: &mut String,
    ) -> Result<(), TemplateError> {
        let Value::List(items) = value else {
            return Err(TemplateError::NotAList {
                name: name.to_string(),
                line,
            });
        };
        if items.is_empty() {
            return self.render_nodes(otherwise, scopes, out);
        }

        for (index, record) in items.iter().enumerate() {
            let mut inner: Vec<Scope<'_>> = scopes.to_vec();
            inner.push(Scope::Item {
                record,
                index,
                count: items.len(),
            });
            self.render_nodes(body, &inner, out)?;
        }
        Ok(())
    }
}

fn display<'v>(value: &'v Value, name: &str, line: usize) -> Result<Cow<'v, str>, TemplateError> {
    match value {
        Value::Text(s) => Ok(Cow::Borrowed(s)),
        Value::Bool(b) => Ok(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::List(_) => Err(TemplateError::MalformedBlock {
            reason: format!("'{name}' is a list; iterate it with '#each'"),
            line,
        }),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TemplateContext {
        TemplateContext::builder()
            .with("name", "Invoice")
            .with("markup", "<b>&</b>")
            .with("yes", true)
            .with("no", false)
            .with("empty", "")
            .with(
                "items",
                vec![
                    Record::new().field("key", "a").field("isAction", false),
                    Record::new().field("key", "b").field("isAction", true),
                    Record::new().field("key", "c").field("isAction", true),
                ],
            )
            .with("none", Vec::<Record>::new())
            .build()
    }

    fn render(source: &str) -> Result<String, TemplateError> {
        BlockRenderer::new().render(source, &ctx())
    }

    #[test]
    fn substitutes_without_escaping_by_default() {
        assert_eq!(render("{{name}} {{markup}}").unwrap(), "Invoice <b>&</b>");
    }

    #[test]
    fn html_mode_escapes_double_braces_only() {
        let renderer = BlockRenderer::with_escape(EscapeMode::Html);
        let out = renderer.render("{{markup}}|{{{markup}}}", &ctx()).unwrap();
        assert_eq!(out, "&lt;b&gt;&amp;&lt;/b&gt;|<b>&</b>");
    }

    #[test]
    fn conditionals() {
        assert_eq!(render("{{#if yes}}Y{{else}}N{{/if}}").unwrap(), "Y");
        assert_eq!(render("{{#if no}}Y{{else}}N{{/if}}").unwrap(), "N");
        assert_eq!(render("{{#if empty}}Y{{/if}}").unwrap(), "");
        assert_eq!(render("{{#unless none}}nothing{{/unless}}").unwrap(), "nothing");
        assert_eq!(render("{{#if items}}some{{/if}}").unwrap(), "some");
    }

    #[test]
    fn each_exposes_fields_and_markers() {
        let out = render("{{#each items}}{{@index}}:{{key}}{{#unless @last}}, {{/unless}}{{/each}}")
            .unwrap();
        assert_eq!(out, "0:a, 1:b, 2:c");

        let out = render("{{#each items}}{{#if @first}}[{{/if}}{{key}}{{/each}}").unwrap();
        assert_eq!(out, "[abc");
    }

    #[test]
    fn each_falls_back_to_outer_scope() {
        let out = render("{{#each items}}{{name}}.{{key}} {{/each}}").unwrap();
        assert_eq!(out, "Invoice.a Invoice.b Invoice.c ");
    }

    #[test]
    fn each_else_renders_for_empty_lists() {
        assert_eq!(render("{{#each none}}x{{else}}empty{{/each}}").unwrap(), "empty");
    }

    #[test]
    fn standalone_lines_produce_clean_output() {
        let source = "\
const store = {
  {{#each items}}
  {{#if isAction}}
  {{key}}: jest.fn(),
  {{else}}
  {{key}}: [],
  {{/if}}
  {{/each}}
};
";
        let expected = "\
const store = {
  a: [],
  b: jest.fn(),
  c: jest.fn(),
};
";
        assert_eq!(render(source).unwrap(), expected);
    }

    #[test]
    fn missing_variable_reports_line() {
        assert_eq!(
            render("ok\n{{nope}}").unwrap_err(),
            TemplateError::MissingVariable {
                name: "nope".into(),
                line: 2
            }
        );
        assert!(matches!(
            render("{{#each items}}{{@index}}{{/each}}{{@index}}"),
            Err(TemplateError::MissingVariable { .. })
        ));
    }

    #[test]
    fn missing_variable_in_untaken_branch_is_reported() {
        assert_eq!(
            render("{{#if no}}{{nope}}{{/if}}ok").unwrap_err(),
            TemplateError::MissingVariable {
                name: "nope".into(),
                line: 1
            }
        );
        assert!(matches!(
            render("{{#if yes}}Y{{else}}\n{{#if typo}}N{{/if}}{{/if}}"),
            Err(TemplateError::MissingVariable { line: 2, .. })
        ));
        assert!(matches!(
            render("{{#each items}}{{#if isAction}}{{key}}{{else}}{{kee}}{{/if}}{{/each}}"),
            Err(TemplateError::MissingVariable { .. })
        ));
    }

    #[test]
    fn names_inside_each_accept_fields_markers_and_outer_names() {
        let out = render("{{#each items}}{{#if no}}{{@last}}{{isAction}}{{name}}{{/if}}{{/each}}")
            .unwrap();
        assert_eq!(out, "");
        // Nothing is known about the fields of an empty list.
        assert_eq!(render("{{#each none}}{{anything}}{{/each}}").unwrap(), "");
    }

    #[test]
    fn each_over_scalar_is_not_a_list() {
        assert_eq!(
            render("{{#each name}}x{{/each}}").unwrap_err(),
            TemplateError::NotAList {
                name: "name".into(),
                line: 1
            }
        );
    }

    #[test]
    fn list_substitution_is_rejected() {
        assert!(matches!(
            render("{{items}}"),
            Err(TemplateError::MalformedBlock { .. })
        ));
    }
}
