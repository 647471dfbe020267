use std::borrow::Cow;

use log::debug;

use kellogg_core::{
    draw::{LineRole, LineStyle},
    geometry::Point,
    grammar::{Category, Child, ConstituencyNode, PhraseTag, join_words},
};

use super::{
    DrawContext, LayoutEngine, LayoutResult, NounRole, StructuralError, StructuralErrorKind,
    engine::content_children,
};

/// Whether a child can serve as the object of a preposition.
fn is_object(node: &ConstituencyNode) -> bool {
    match node.category() {
        Category::Phrase(tag) => matches!(tag, PhraseTag::Np | PhraseTag::Sbar) || tag.is_clause(),
        Category::Pos(tag) => tag.is_noun() || tag.is_pronoun(),
    }
}

/// Folds everything after the object into one NP so nested phrases hang
/// off the object's baseline.
fn object_with_trailing<'n>(
    object: &'n ConstituencyNode,
    trailing: &[&'n ConstituencyNode],
) -> Cow<'n, ConstituencyNode> {
    if trailing.is_empty() || !object.is(PhraseTag::Np) {
        return Cow::Borrowed(object);
    }

    let span = trailing
        .iter()
        .fold(object.span(), |span, child| span.union(child.span()));
    let children = std::iter::once(object)
        .chain(trailing.iter().copied())
        .map(|child| Child::Node(child.clone()))
        .collect();
    ConstituencyNode::new(Category::Phrase(PhraseTag::Np), children, span)
        .map_or(Cow::Borrowed(object), Cow::Owned)
}

impl LayoutEngine<'_> {
    /// Lays out a prepositional phrase hanging from `origin` on its
    /// governing baseline.
    ///
    /// The preposition is written along a diagonal that drops to the right;
    /// the object sits on its own baseline at the foot. The diagonal
    /// stretches when the preposition is too long for the default run.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralErrorKind::MissingPreposition`] when no IN or TO
    /// precedes the object, and
    /// [`StructuralErrorKind::MissingPrepositionObject`] when there is no
    /// object.
    pub fn process_prepositional_phrase(
        &self,
        node: &ConstituencyNode,
        origin: Point,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        let children: Vec<&ConstituencyNode> = content_children(node).collect();
        let has_preposition = |nodes: &[&ConstituencyNode]| {
            nodes
                .iter()
                .any(|child| child.pos().is_some_and(|tag| tag.is_preposition()))
        };

        // `(PP (PP in the house) (CC and) (PP on the roof))`
        let nested = children.iter().filter(|child| child.is(PhraseTag::Pp)).count();
        if nested >= 2 && !has_preposition(&children) {
            return self.layout_prepositional_sequence(&children, origin, ctx);
        }

        let object_index = children.iter().position(|child| is_object(child));
        let leading = &children[..object_index.unwrap_or(children.len())];
        if !has_preposition(leading) {
            return Err(StructuralError::new(
                StructuralErrorKind::MissingPreposition,
                node,
            ));
        }
        let Some(object_index) = object_index else {
            return Err(StructuralError::new(
                StructuralErrorKind::MissingPrepositionObject,
                node,
            ));
        };

        let words: Vec<String> = leading.iter().map(|child| child.text()).collect();
        let preposition = join_words(words.iter().map(String::as_str));
        let object = object_with_trailing(children[object_index], &children[object_index + 1..]);
        debug!(
            preposition = preposition.as_str(),
            object = object.text().as_str();
            "Prepositional phrase"
        );

        let foot = self.preposition_foot(&preposition, origin);
        let bounds = self.diagonal_with_label(
            ctx,
            &preposition,
            origin,
            foot,
            LineStyle::Solid,
            LineRole::PrepositionDiagonal,
        );

        let result = if object.is(PhraseTag::Np) || object.pos().is_some() {
            self.process_noun_phrase(&object, foot, NounRole::PrepositionObject, ctx)?
        } else {
            self.process_subordinate_clause(&object, foot, ctx)?
        };

        let right = bounds.max_x().max(foot.x() + result.width());
        let top = bounds.min_y().min(foot.y() - result.ascent());
        let bottom = bounds.max_y().max(foot.y() + result.descent());
        Ok(LayoutResult::new(
            right - origin.x(),
            origin.y() - top,
            bottom - origin.y(),
            origin,
            origin.x(),
        ))
    }

    /// Foot of the diagonal for `label`, scaled up from the configured run
    /// and drop until the label fits along it.
    fn preposition_foot(&self, label: &str, origin: Point) -> Point {
        let config = self.config();
        let run = config.preposition_run();
        let drop = config.preposition_drop();
        let length = run.hypot(drop);

        let size = self.measure(label);
        let lift = config.label_lift();
        let half = size.width() / 2.0;
        let clearance = half + lift + run / drop * (lift + size.height());
        let scale = ((clearance + half + lift) / length).max(1.0);

        Point::new(origin.x() + run * scale, origin.y() + drop * scale)
    }

    fn layout_prepositional_sequence(
        &self,
        children: &[&ConstituencyNode],
        origin: Point,
        ctx: &mut DrawContext,
    ) -> Result<LayoutResult, StructuralError> {
        let pad = self.config().padding();
        let mut cursor = origin.x();
        let mut ascent = 0.0_f32;
        let mut descent = 0.0_f32;

        for phrase in children.iter().filter(|child| child.is(PhraseTag::Pp)) {
            let result = self.process_prepositional_phrase(phrase, Point::new(cursor, origin.y()), ctx)?;
            cursor += result.width() + pad;
            ascent = ascent.max(result.ascent());
            descent = descent.max(result.descent());
        }

        Ok(LayoutResult::new(
            cursor - pad - origin.x(),
            ascent,
            descent,
            origin,
            origin.x(),
        ))
    }
}
