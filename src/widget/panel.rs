//! Panel: A box with nothing inside.

use crate::primitive::{Block, Primitive};
use crate::style::Theme;
use crate::terminal::Screen;
use std::sync::{Arc, Weak};

/// A bare primitive that only draws its [`Block`].
///
/// Useful as a placeholder, a background, or a titled frame around
/// content drawn elsewhere.
#[derive(Debug)]
pub struct Panel {
    block: Block,
}

impl Panel {
    /// Create a panel with the default theme.
    pub fn new() -> Arc<Self> {
        Self::with_theme(&Theme::DEFAULT)
    }

    /// Create a panel with `theme`.
    pub fn with_theme(theme: &Theme) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let handle: Weak<dyn Primitive> = weak.clone();
            Self {
                block: Block::new(theme, handle),
            }
        })
    }
}

impl Primitive for Panel {
    fn block(&self) -> &Block {
        &self.block
    }

    fn draw(&self, screen: &mut dyn Screen) {
        self.block.draw(screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::layout::Rect;

    #[test]
    fn test_panel_draws_titled_box() {
        let panel = Panel::new();
        panel.set_rect(Rect::new(1, 0, 8, 3));
        panel.block().set_border(true);
        panel.block().set_title("[red]Log");

        let mut buf = Buffer::new(10, 3);
        panel.draw(&mut buf);
        assert_eq!(buf.row_text(0), " ┌─Log──┐ ");
        assert_eq!(
            buf.get(4, 0).and_then(|c| c.fg()),
            Some(crate::style::Color::Red)
        );
    }
}
