use super::{clamp_dimension, normalize_rotation, EditTool, LayoutChange, Point, TableLayout, ROTATION_STEP};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Moving { last: Point },
    Resizing { origin: Point, width: f64, height: f64 },
}

/// Estado interactivo de una mesa del plano
#[derive(Debug, Clone, PartialEq)]
pub struct TableElement {
    id: String,
    layout: TableLayout,
    gesture: Gesture,
}

impl TableElement {
    pub fn new(id: impl Into<String>, layout: TableLayout) -> Self {
        Self {
            id: id.into(),
            layout,
            gesture: Gesture::Idle,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn layout(&self) -> TableLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: TableLayout) {
        self.layout = layout;
    }

    /// Hay un arrastre o redimensionado en curso (los eventos de movimiento
    /// sólo se escuchan mientras esto sea cierto)
    pub fn is_tracking(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Inicio de gesto. La rotación se aplica aquí mismo: es un clic, no un arrastre.
    pub fn pointer_down(&mut self, tool: EditTool, at: Point) -> Option<LayoutChange> {
        match tool {
            EditTool::Select => None,
            EditTool::Move => {
                self.gesture = Gesture::Moving { last: at };
                None
            }
            EditTool::Resize => {
                self.gesture = Gesture::Resizing {
                    origin: at,
                    width: self.layout.width,
                    height: self.layout.height,
                };
                None
            }
            EditTool::Rotate => {
                self.layout.rotation = normalize_rotation(self.layout.rotation + ROTATION_STEP);
                Some(LayoutChange::Rotation {
                    degrees: self.layout.rotation,
                })
            }
        }
    }

    /// Cada movimiento emite el valor absoluto nuevo, no sólo al soltar
    pub fn pointer_move(&mut self, at: Point) -> Option<LayoutChange> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Moving { last } => {
                self.layout.x += at.x - last.x;
                self.layout.y += at.y - last.y;
                self.gesture = Gesture::Moving { last: at };
                Some(LayoutChange::Position {
                    x: self.layout.x,
                    y: self.layout.y,
                })
            }
            Gesture::Resizing { origin, width, height } => {
                self.layout.width = clamp_dimension(width + (at.x - origin.x));
                self.layout.height = clamp_dimension(height + (at.y - origin.y));
                Some(LayoutChange::Size {
                    width: self.layout.width,
                    height: self.layout.height,
                })
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.gesture = Gesture::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element() -> TableElement {
        TableElement::new(
            "t1",
            TableLayout {
                x: 100.0,
                y: 40.0,
                width: 80.0,
                height: 80.0,
                rotation: 0.0,
            },
        )
    }

    #[test]
    fn drag_adds_every_delta() {
        let mut table = element();
        table.pointer_down(EditTool::Move, Point::new(10.0, 10.0));

        let moves = [(15.0, 12.0), (30.0, 5.0), (22.0, 25.0), (-40.0, 60.0)];
        let mut emitted = Vec::new();
        for (x, y) in moves {
            emitted.push(table.pointer_move(Point::new(x, y)));
        }
        table.pointer_up();

        // Origen (10,10) -> último (-40,60): delta total (-50, +50)
        assert_eq!(table.layout().x, 50.0);
        assert_eq!(table.layout().y, 90.0);
        assert_eq!(emitted.len(), 4);
        assert!(emitted.iter().all(|c| matches!(c, Some(LayoutChange::Position { .. }))));
        assert_eq!(emitted[0], Some(LayoutChange::Position { x: 105.0, y: 42.0 }));
    }

    #[test]
    fn resize_is_clamped_for_any_negative_delta() {
        let mut table = element();
        table.pointer_down(EditTool::Resize, Point::new(0.0, 0.0));

        assert_eq!(
            table.pointer_move(Point::new(20.0, -10.0)),
            Some(LayoutChange::Size { width: 100.0, height: 70.0 })
        );
        for delta in [-31.0, -500.0, -1e9] {
            table.pointer_move(Point::new(delta, delta));
            assert_eq!(table.layout().width, 50.0);
            assert_eq!(table.layout().height, 50.0);
        }
        // El tamaño se calcula desde el inicio del gesto, no acumulado
        table.pointer_move(Point::new(5.0, 5.0));
        assert_eq!(table.layout().width, 85.0);
    }

    #[test]
    fn rotate_is_a_single_click() {
        let mut table = element();
        for n in 1..=10 {
            let change = table.pointer_down(EditTool::Rotate, Point::default());
            let expected = (45.0 * n as f64) % 360.0;
            assert_eq!(change, Some(LayoutChange::Rotation { degrees: expected }));
            assert!(!table.is_tracking());
        }
    }

    #[test]
    fn moves_are_ignored_outside_a_gesture() {
        let mut table = element();
        assert_eq!(table.pointer_move(Point::new(500.0, 500.0)), None);

        table.pointer_down(EditTool::Move, Point::new(0.0, 0.0));
        assert!(table.is_tracking());
        table.pointer_up();
        assert!(!table.is_tracking());
        assert_eq!(table.pointer_move(Point::new(500.0, 500.0)), None);
        assert_eq!(table.layout().x, 100.0);
    }
}
