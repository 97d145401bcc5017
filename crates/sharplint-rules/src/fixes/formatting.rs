//! Fixes for the layout rules

use rowan::NodeOrToken;
use sharplint_core::cst::{SyntaxKind, make, trivia};
use sharplint_core::Result;

use super::{CodeFixProvider, FixContext, FixOutcome, applied, replace};
use crate::analyzers::formatting::{declaration_gaps, trailing_operator};
use crate::analyzers::{ADD_EMPTY_LINE_BETWEEN_DECLARATIONS, PLACE_BINARY_OPERATOR_AT_LINE_START};

/// Doubles the line break between two member declarations
#[derive(Debug, Clone, Copy, Default)]
pub struct AddEmptyLineBetweenDeclarationsFix;

impl CodeFixProvider for AddEmptyLineBetweenDeclarationsFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[ADD_EMPTY_LINE_BETWEEN_DECLARATIONS]
    }

    fn title(&self) -> &'static str {
        "Add empty line"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let newline = ctx
            .anchor()
            .and_then(|element| element.into_token())
            .filter(|token| token.kind() == SyntaxKind::Newline);
        let gap = newline.filter(|token| {
            token
                .parent()
                .is_some_and(|container| declaration_gaps(&container).contains(token))
        });
        let Some(newline) = gap else {
            return Ok(FixOutcome::not_applicable("declarations are already separated"));
        };
        // Same line ending as the break already there
        let blank = make::newline(newline.text());
        let document = ctx
            .document()
            .insert_after(&NodeOrToken::Token(newline), vec![blank])?;
        Ok(applied(self, ctx, document).into())
    }
}

/// Moves a binary operator from the end of a line to the start of the next
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceBinaryOperatorAtLineStartFix;

impl CodeFixProvider for PlaceBinaryOperatorAtLineStartFix {
    fn fixable_rule_ids(&self) -> &'static [&'static str] {
        &[PLACE_BINARY_OPERATOR_AT_LINE_START]
    }

    fn title(&self) -> &'static str {
        "Place operator at the start of the line"
    }

    fn build_fix(&self, ctx: &FixContext<'_>) -> Result<FixOutcome> {
        let Some((node, found)) = ctx
            .node_of_kind(SyntaxKind::BinaryExpr)
            .and_then(|node| trailing_operator(&node).map(|found| (node, found)))
        else {
            return Ok(FixOutcome::not_applicable("operator is not at a line end"));
        };

        let mut line_break = vec![found.newline];
        line_break.extend(found.indent);
        let mut children =
            trivia::with_trailing_trivia(NodeOrToken::Node(make::green(&found.left)), &line_break);
        children.push(make::element(&NodeOrToken::Token(found.operator)));
        children.push(make::space());
        children.push(NodeOrToken::Node(make::green(&found.right)));

        replace(self, ctx, &node, make::node(SyntaxKind::BinaryExpr, children))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::{AddEmptyLineBetweenDeclarations, PlaceBinaryOperatorAtLineStart};
    use crate::fixes::test_support::{fix, fixed};

    #[test]
    fn blank_line_is_added_after_a_multi_line_member() {
        let source = "class C\n{\n    void M()\n    {\n    }\n    void N() { }\n}\n";
        insta::assert_snapshot!(
            fix(
                &AddEmptyLineBetweenDeclarations::new(),
                &AddEmptyLineBetweenDeclarationsFix,
                source,
            ),
            @r"
        class C
        {
            void M()
            {
            }

            void N() { }
        }
        "
        );
    }

    #[test]
    fn crlf_is_kept() {
        let source = "class C\r\n{\r\n    void M()\r\n    {\r\n    }\r\n    int f;\r\n}\r\n";
        let fixed = fix(
            &AddEmptyLineBetweenDeclarations::new(),
            &AddEmptyLineBetweenDeclarationsFix,
            source,
        );
        assert_eq!(
            fixed,
            "class C\r\n{\r\n    void M()\r\n    {\r\n    }\r\n\r\n    int f;\r\n}\r\n"
        );
    }

    #[test]
    fn operator_moves_to_the_next_line() {
        let source = "class C\n{\n    bool M(bool a, bool b) => a &&\n        b;\n}\n";
        assert_eq!(
            fix(&PlaceBinaryOperatorAtLineStart::new(), &PlaceBinaryOperatorAtLineStartFix, source),
            "class C\n{\n    bool M(bool a, bool b) => a\n        && b;\n}\n"
        );
    }

    #[test]
    fn operator_already_leading_has_no_fix() {
        let source = "class C\n{\n    bool M(bool a, bool b) => a\n        && b;\n}\n";
        assert!(
            fixed(
                &PlaceBinaryOperatorAtLineStart::new(),
                &PlaceBinaryOperatorAtLineStartFix,
                source,
            )
            .is_none()
        );
    }
}
