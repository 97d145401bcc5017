//! Invocation shapes: `receiver.Name(args)` and single-parameter lambdas

use sharplint_core::cst::ast::{self, AstNode};
use sharplint_core::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

use super::{ExtractOptions, ShapeInfo, accepts, anchor_identity, walk_down};

/// `receiver.Name(arguments)`; conditional access (`?.`) does not match
#[derive(Debug, Clone)]
pub struct MemberInvocationInfo {
    anchor: SyntaxNode,
    member_access: SyntaxNode,
    receiver: SyntaxNode,
    dot: SyntaxToken,
    name: ast::NameRef,
    name_text: String,
    arg_list: ast::ArgList,
    arguments: Vec<ast::Argument>,
}

impl MemberInvocationInfo {
    /// The `receiver.Name` callee
    pub fn member_access(&self) -> &SyntaxNode {
        &self.member_access
    }

    pub fn receiver(&self) -> &SyntaxNode {
        &self.receiver
    }

    pub fn dot(&self) -> &SyntaxToken {
        &self.dot
    }

    pub fn name(&self) -> &ast::NameRef {
        &self.name
    }

    pub fn name_text(&self) -> &str {
        &self.name_text
    }

    pub fn arg_list(&self) -> &ast::ArgList {
        &self.arg_list
    }

    pub fn arguments(&self) -> &[ast::Argument] {
        &self.arguments
    }

    /// The receiver as another member invocation: `a.Where(p)` in `a.Where(p).Any()`
    pub fn inner(&self, options: ExtractOptions) -> Option<MemberInvocationInfo> {
        Self::extract(&self.receiver, options)
    }
}

impl ShapeInfo for MemberInvocationInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let anchor = walk_down(node, options);
        let invocation = ast::InvocationExpr::cast(anchor.clone())?;
        let access = invocation.member_access()?;
        if access.is_conditional() {
            return None;
        }
        let dot = access
            .syntax()
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::Dot)?;
        let name = access.name_ref()?;
        let arg_list = invocation.arg_list()?;
        let info = Self {
            member_access: access.syntax().clone(),
            receiver: access.receiver()?,
            dot,
            name_text: name.text()?,
            name,
            arguments: arg_list.args().collect(),
            arg_list,
            anchor,
        };
        accepts(&info.anchor, options).then_some(info)
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

/// `x => body` or `(x) => body`
#[derive(Debug, Clone)]
pub struct SingleParameterLambdaInfo {
    anchor: SyntaxNode,
    parameter: ast::Parameter,
    parameter_name: String,
    body: SyntaxNode,
}

impl SingleParameterLambdaInfo {
    pub fn parameter(&self) -> &ast::Parameter {
        &self.parameter
    }

    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }

    /// Expression or block after `=>`
    pub fn body(&self) -> &SyntaxNode {
        &self.body
    }

    pub fn has_expression_body(&self) -> bool {
        self.body.kind().is_expression()
    }
}

impl ShapeInfo for SingleParameterLambdaInfo {
    fn extract(node: &SyntaxNode, options: ExtractOptions) -> Option<Self> {
        let anchor = walk_down(node, options);
        let lambda = ast::LambdaExpr::cast(anchor.clone())?;
        let [parameter] = <[ast::Parameter; 1]>::try_from(lambda.parameters()).ok()?;
        let info = Self {
            parameter_name: parameter.name()?,
            parameter,
            body: lambda.body()?,
            anchor,
        };
        accepts(&info.anchor, options).then_some(info)
    }

    fn anchor(&self) -> &SyntaxNode {
        &self.anchor
    }
}

anchor_identity!(MemberInvocationInfo, SingleParameterLambdaInfo);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::tests::node;

    #[test]
    fn member_invocation_parts() {
        let source = "class C { bool M() => items.Where(x => x.Ok).Any(); }";
        let outer = node(source, SyntaxKind::InvocationExpr);
        let info = MemberInvocationInfo::of(&outer).unwrap();
        assert_eq!(info.name_text(), "Any");
        assert!(info.arguments().is_empty());
        assert_eq!(info.receiver().text(), "items.Where(x => x.Ok)");
        assert_eq!(info.dot().kind(), SyntaxKind::Dot);

        let inner = info.inner(ExtractOptions::default()).unwrap();
        assert_eq!(inner.name_text(), "Where");
        assert_eq!(inner.arguments().len(), 1);
        assert_eq!(inner.receiver().text(), "items");
        assert!(inner.inner(ExtractOptions::default()).is_none());
    }

    #[test]
    fn plain_calls_and_conditional_access_do_not_match() {
        let call = node("class C { void M() { Run(a); } }", SyntaxKind::InvocationExpr);
        assert!(MemberInvocationInfo::of(&call).is_none());
        let conditional = node("class C { void M() { a?.Run(); } }", SyntaxKind::InvocationExpr);
        assert!(MemberInvocationInfo::of(&conditional).is_none());
    }

    #[test]
    fn single_parameter_lambdas() {
        let simple = node("class C { void M() { F(x => x.Ok); } }", SyntaxKind::LambdaExpr);
        let info = SingleParameterLambdaInfo::of(&simple).unwrap();
        assert_eq!(info.parameter_name(), "x");
        assert_eq!(info.body().text(), "x.Ok");
        assert!(info.has_expression_body());

        let parenthesized = node("class C { void M() { F((y) => { }); } }", SyntaxKind::LambdaExpr);
        let info = SingleParameterLambdaInfo::of(&parenthesized).unwrap();
        assert_eq!(info.parameter_name(), "y");
        assert!(!info.has_expression_body());

        let pair = node("class C { void M() { F((a, b) => a); } }", SyntaxKind::LambdaExpr);
        assert!(SingleParameterLambdaInfo::of(&pair).is_none());
    }
}
