use log::debug;

use kellogg_core::{
    geometry::Point,
    grammar::{ConstituencyNode, PhraseTag},
};

use super::{
    CompoundKind, DrawContext, LayoutEngine, LayoutResult, ModifierBias, StructuralError,
    StructuralErrorKind,
    compound::is_compound,
    engine::{Attachments, Frontier, content_children},
};

impl LayoutEngine<'_> {
    /// Lays out an adjective phrase on its own baseline at `origin`.
    ///
    /// The head is the last adjective, else the last participle, else a
    /// nested ADJP. Degree adverbs hang below the head; prepositional
    /// phrases (`afraid of dogs`) and clausal complements (`eager to help`)
    /// follow as they do for nouns.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralErrorKind::MissingAdjective`] when no head is
    /// found.
    pub fn process_adjective_phrase(
        &self,
        node: &ConstituencyNode,
        origin: Point,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        if is_compound(node, PhraseTag::Adjp) {
            return self.process_compound(node, CompoundKind::Adjective, origin, ctx);
        }

        if node.pos().is_some() {
            let text = node.text();
            let frontier = self.layout_word_head(ctx, &text, &[], origin, ModifierBias::Trailing);
            return self.attach_trailing(ctx, frontier, &Attachments::default(), origin);
        }

        let children: Vec<&ConstituencyNode> = content_children(node).collect();
        let head_index = children
            .iter()
            .rposition(|child| child.pos().is_some_and(|tag| tag.is_adjective()))
            .or_else(|| {
                children
                    .iter()
                    .rposition(|child| child.pos().is_some_and(|tag| tag.is_participle()))
            })
            .or_else(|| children.iter().position(|child| child.is(PhraseTag::Adjp)));
        let Some(head_index) = head_index else {
            return Err(StructuralError::new(StructuralErrorKind::MissingAdjective, node));
        };

        let mut modifiers = Vec::new();
        let mut trailing = Attachments::default();
        for (index, child) in children.iter().copied().enumerate() {
            if index == head_index {
                continue;
            }
            match child.phrase() {
                Some(PhraseTag::Pp) => trailing.prepositions.push(child),
                Some(tag) if tag.is_clause() || matches!(tag, PhraseTag::Sbar | PhraseTag::Vp) => {
                    trailing.clauses.push(child)
                }
                _ => modifiers.push(child.text()),
            }
        }

        let head = children[head_index];
        let frontier = if head.pos().is_some() {
            let text = head.text();
            debug!(head = text.as_str(), modifiers = modifiers.len(); "Adjective phrase");
            self.layout_word_head(ctx, &text, &modifiers, origin, ModifierBias::Trailing)
        } else {
            let result = self.process_adjective_phrase(head, origin, ctx)?;
            trailing.modifiers = modifiers;
            Frontier::after(&result, origin)
        };

        self.attach_trailing(ctx, frontier, &trailing, origin)
    }
}
