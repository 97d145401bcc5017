//! Fixes for the ordering rules
//!
//! All three permute existing elements; nothing is created and the trivia
//! between the permuted elements stays where it was.

use rowan::NodeOrToken;
use sharplint_core::cst::ast::AstNode;
use sharplint_core::cst::{SyntaxKind, make};
use sharplint_core::Result;

use super::{CodeFixProvider, FixContext, FixOutcome, applied, replace};
use crate::analyzers::ordering::{
    GENERIC_KINDS, MEMBER_KINDS, misordered_constraints, misordered_modifiers, misplaced_default,
};
use crate::analyzers::{
    DEFAULT_LABEL_SHOULD_BE_LAST, REORDER_MODIFIERS, REORDER_TYPE_PARAMETER_CONSTRAINTS,
};

/// Swaps `default:` with the last label of its section
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLabelShouldBeLastFix;

impl CodeFixProvider for DefaultLabelShouldBeLastFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[DEFAULT_LABEL_SHOULD_BE_LAST]
    }

    fn title(&self) -> &'static str {
        "Move default label to the last position"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let Some((default, last)) = ctx
            .node_of_kind(SyntaxKind::SwitchSection)
            .and_then(|section| misplaced_default(&section))
        else {
            return Ok(FixOutcome::not_applicable("default label is already last"));
        };
        let document = ctx.document().swap_nodes(&default, &last)?;
        Ok(applied(self, ctx, document).into())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReorderModifiersFix;

impl CodeFixProvider for ReorderModifiersFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[REORDER_MODIFIERS]
    }

    fn title(&self) -> &'static str {
        "Reorder modifiers"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let Some(order) = ctx
            .node_of_kinds(MEMBER_KINDS)
            .and_then(|member| misordered_modifiers(&member, ctx.options()))
        else {
            return Ok(FixOutcome::not_applicable("modifiers are in order"));
        };
        let list = order.info.list().syntax();
        let mut sorted = order.sorted.iter();
        let green = make::rebuild(list, |child| match child {
            NodeOrToken::Token(token) if token.kind().is_modifier() => sorted
                .next()
                .map(|modifier| vec![make::element(&NodeOrToken::Token(modifier.clone()))]),
            _ => None,
        });
        replace(self, ctx, list, green)
    }
}

/// Sorts `where` clauses by type parameter position
#[derive(Debug, Clone, Copy, Default)]
pub struct ReorderTypeParameterConstraintsFix;

impl CodeFixProvider for ReorderTypeParameterConstraintsFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[REORDER_TYPE_PARAMETER_CONSTRAINTS]
    }

    fn title(&self) -> &'static str {
        "Reorder type parameter constraints"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        // The clause sits inside the declaration it constrains, but a method
        // inside a class also sits inside the class: take the innermost one
        // that actually has misordered clauses.
        let found = ctx.anchor().and_then(|anchor| {
            let start = match anchor {
                NodeOrToken::Node(node) => node,
                NodeOrToken::Token(token) => token.parent()?,
            };
            start
                .ancestors()
                .filter(|node| GENERIC_KINDS.contains(&node.kind()))
                .find_map(|node| misordered_constraints(&node).map(|found| (node, found)))
        });
        let Some((declaration, (info, _))) = found else {
            return Ok(FixOutcome::not_applicable("constraints are in order"));
        };

        let mut sorted = info.sorted().into_iter();
        let green = make::rebuild(&declaration, |child| match child {
            NodeOrToken::Node(node) if node.kind() == SyntaxKind::ConstraintClause => sorted
                .next()
                .map(|clause| vec![NodeOrToken::Node(make::green(clause.syntax()))]),
            _ => None,
        });
        replace(self, ctx, &declaration, green)
    }
}
