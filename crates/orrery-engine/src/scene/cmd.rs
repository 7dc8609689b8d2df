use crate::scene::shapes::circle::CircleCmd;
use crate::scene::shapes::line::LineCmd;
use crate::scene::shapes::text::TextCmd;

/// One recorded primitive, in logical pixels.
///
/// Projected bodies arrive as `Circle`, orbit guides as `Line`, and labels
/// plus HUD text as `Text`. Each variant has a push helper next to its payload
/// under `scene::shapes` and a matching renderer under `render::shapes`.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Circle(CircleCmd),
    Line(LineCmd),
    Text(TextCmd),
}
