use std::collections::HashMap;

use super::{clamp_dimension, normalize_rotation, EditTool, LayoutChange, Point, TableElement, TableLayout};
use crate::api::middleware::ErrorLogExt;
use crate::api::AppResult;
use crate::db::models::{LayoutUpdate, RestaurantTable};
use crate::db::{Query, Repo};

/// Resultado de pedir salir del modo edición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Exited,
    /// Hay cambios sin guardar: el usuario debe confirmar (guardar) o descartar
    ConfirmRequired,
}

/// Sesión de edición del plano de una sala
#[derive(Debug, Clone)]
pub struct FloorPlanEditor {
    room_id: Option<String>,
    tables: Vec<TableElement>,
    /// Última disposición guardada de cada mesa
    persisted: HashMap<String, TableLayout>,
    editing: bool,
    tool: EditTool,
    selected: Option<String>,
}

impl FloorPlanEditor {
    /// Construye el editor con las mesas de `room_id` (`None` = todas las salas)
    pub fn new(room_id: Option<String>, tables: Vec<RestaurantTable>) -> Self {
        let tables: Vec<TableElement> = tables
            .into_iter()
            .filter(|t| room_id.is_none() || t.room_id == room_id)
            .map(|t| TableElement::new(t.id.clone(), t.layout()))
            .collect();

        let persisted = tables
            .iter()
            .map(|t| (t.id().to_string(), t.layout()))
            .collect();

        Self {
            room_id,
            tables,
            persisted,
            editing: false,
            tool: EditTool::Select,
            selected: None,
        }
    }

    pub async fn load(repo: &Repo<RestaurantTable>, room_id: Option<String>) -> AppResult<Self> {
        let query = match &room_id {
            Some(room) => Query::new().eq("room_id", room.as_str()),
            None => Query::new(),
        };
        let tables = repo.list(query).await?;
        Ok(Self::new(room_id, tables))
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn tool(&self) -> EditTool {
        self.tool
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn tables(&self) -> &[TableElement] {
        &self.tables
    }

    pub fn layout_of(&self, table_id: &str) -> Option<TableLayout> {
        self.element(table_id).map(TableElement::layout)
    }

    fn element(&self, table_id: &str) -> Option<&TableElement> {
        self.tables.iter().find(|t| t.id() == table_id)
    }

    fn element_mut(&mut self, table_id: &str) -> Option<&mut TableElement> {
        self.tables.iter_mut().find(|t| t.id() == table_id)
    }

    /// Entrar en edición: herramienta `select` y sin selección
    pub fn enter_edit_mode(&mut self) {
        self.editing = true;
        self.tool = EditTool::Select;
        self.selected = None;
    }

    /// Cambia de herramienta. Fuera del modo edición sólo vale `select`.
    pub fn set_tool(&mut self, tool: EditTool) -> bool {
        if !self.editing && tool != EditTool::Select {
            return false;
        }
        self.release_gestures();
        self.tool = tool;
        true
    }

    /// Pulsación sobre una mesa. Sin edición (o con `select`) sólo la selecciona.
    pub fn pointer_down(&mut self, table_id: &str, at: Point) -> Option<LayoutChange> {
        let tool = if self.editing { self.tool } else { EditTool::Select };
        let element = self.element_mut(table_id)?;
        let change = element.pointer_down(tool, at);
        self.selected = Some(table_id.to_string());

        if let Some(change) = change {
            self.apply(table_id, change);
        }
        change
    }

    /// Movimiento del puntero; sólo afecta a la mesa con un gesto en curso
    pub fn pointer_move(&mut self, at: Point) -> Option<(String, LayoutChange)> {
        let element = self.tables.iter_mut().find(|t| t.is_tracking())?;
        let change = element.pointer_move(at)?;
        let id = element.id().to_string();
        self.apply(&id, change);
        Some((id, change))
    }

    pub fn pointer_up(&mut self) {
        self.release_gestures();
    }

    fn release_gestures(&mut self) {
        for table in &mut self.tables {
            table.pointer_up();
        }
    }

    fn apply(&mut self, table_id: &str, change: LayoutChange) {
        match change {
            LayoutChange::Position { x, y } => self.update_table_position(table_id, x, y),
            LayoutChange::Size { width, height } => self.update_table_size(table_id, width, height),
            LayoutChange::Rotation { degrees } => self.update_table_rotation(table_id, degrees),
        }
    }

    pub fn update_table_position(&mut self, table_id: &str, x: f64, y: f64) {
        if let Some(table) = self.element_mut(table_id) {
            let mut layout = table.layout();
            layout.x = x;
            layout.y = y;
            table.set_layout(layout);
        }
    }

    pub fn update_table_size(&mut self, table_id: &str, width: f64, height: f64) {
        if let Some(table) = self.element_mut(table_id) {
            let mut layout = table.layout();
            layout.width = clamp_dimension(width);
            layout.height = clamp_dimension(height);
            table.set_layout(layout);
        }
    }

    pub fn update_table_rotation(&mut self, table_id: &str, degrees: f64) {
        if let Some(table) = self.element_mut(table_id) {
            let mut layout = table.layout();
            layout.rotation = normalize_rotation(degrees);
            table.set_layout(layout);
        }
    }

    /// Cambios respecto a lo último guardado (no respecto a si hubo eventos)
    pub fn has_unsaved_changes(&self) -> bool {
        !self.pending_updates().is_empty()
    }

    pub fn pending_updates(&self) -> Vec<LayoutUpdate> {
        self.tables
            .iter()
            .filter(|t| self.persisted.get(t.id()) != Some(&t.layout()))
            .map(|t| LayoutUpdate::new(t.id(), t.layout()))
            .collect()
    }

    /// Guarda las mesas modificadas. Ante un fallo se detiene; las mesas ya
    /// guardadas quedan marcadas como persistidas y el resto sigue pendiente.
    pub async fn save(&mut self, repo: &Repo<RestaurantTable>) -> AppResult<usize> {
        let mut saved = 0;

        for update in self.pending_updates() {
            let stored = repo
                .update(&update.id, &update)
                .await
                .log_error_context("saving floor plan")?;
            self.persisted.insert(stored.id.clone(), stored.layout());
            saved += 1;
        }

        tracing::info!(room_id = ?self.room_id, saved, "Floor plan saved");
        Ok(saved)
    }

    /// Vuelve a la última disposición guardada
    pub fn revert(&mut self) {
        self.release_gestures();
        for table in &mut self.tables {
            if let Some(layout) = self.persisted.get(table.id()) {
                table.set_layout(*layout);
            }
        }
    }

    /// Pide salir del modo edición; con cambios sin guardar exige confirmación
    pub fn request_exit(&mut self) -> ExitOutcome {
        if self.editing && self.has_unsaved_changes() {
            return ExitOutcome::ConfirmRequired;
        }
        self.exit();
        ExitOutcome::Exited
    }

    /// Respuesta a la confirmación: `save = true` guarda y sale; `false` descarta y sale.
    /// Si el guardado falla se sigue en modo edición.
    pub async fn confirm_exit(&mut self, save: bool, repo: &Repo<RestaurantTable>) -> AppResult<()> {
        if save {
            self.save(repo).await?;
        } else {
            self.revert();
        }
        self.exit();
        Ok(())
    }

    fn exit(&mut self) {
        self.release_gestures();
        self.editing = false;
        self.tool = EditTool::Select;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{TableShape, TableStatus};
    use crate::db::{MemoryClient, QueryClient};
    use std::sync::Arc;

    fn table(id: &str, room: &str, x: f64) -> RestaurantTable {
        RestaurantTable {
            id: id.into(),
            room_id: Some(room.into()),
            table_number: 1,
            capacity: 4,
            status: TableStatus::Available,
            shape: TableShape::Rectangle,
            position_x: x,
            position_y: 0.0,
            width: 80.0,
            height: 80.0,
            rotation: 0.0,
            created_at: 0,
        }
    }

    fn editor() -> FloorPlanEditor {
        FloorPlanEditor::new(
            Some("patio".into()),
            vec![table("t1", "patio", 0.0), table("t2", "patio", 200.0), table("t3", "bar", 0.0)],
        )
    }

    async fn seeded_repo(db: Arc<MemoryClient>) -> Repo<RestaurantTable> {
        let client: Arc<dyn QueryClient> = db;
        let repo = Repo::new(client);
        for t in editor_tables() {
            repo.insert(t).await.unwrap();
        }
        repo
    }

    fn editor_tables() -> Vec<RestaurantTable> {
        vec![table("t1", "patio", 0.0), table("t2", "patio", 200.0)]
    }

    fn drag(editor: &mut FloorPlanEditor, id: &str, dx: f64, dy: f64) {
        editor.pointer_down(id, Point::new(0.0, 0.0));
        editor.pointer_move(Point::new(dx / 2.0, dy / 2.0));
        editor.pointer_move(Point::new(dx, dy));
        editor.pointer_up();
    }

    #[test]
    fn only_tables_of_the_room_are_loaded() {
        let editor = editor();
        assert_eq!(editor.tables().len(), 2);
        let all = FloorPlanEditor::new(None, vec![table("a", "patio", 0.0), table("b", "bar", 0.0)]);
        assert_eq!(all.tables().len(), 2);
    }

    #[test]
    fn outside_edit_mode_clicks_only_select() {
        let mut editor = editor();
        assert!(!editor.set_tool(EditTool::Move));

        assert_eq!(editor.pointer_down("t1", Point::new(0.0, 0.0)), None);
        assert_eq!(editor.selected(), Some("t1"));
        assert_eq!(editor.pointer_move(Point::new(50.0, 50.0)), None);
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn entering_edit_mode_resets_tool_and_selection() {
        let mut editor = editor();
        editor.pointer_down("t2", Point::default());
        editor.enter_edit_mode();
        assert!(editor.set_tool(EditTool::Rotate));

        editor.enter_edit_mode();
        assert_eq!(editor.tool(), EditTool::Select);
        assert_eq!(editor.selected(), None);
    }

    #[test]
    fn unsaved_flag_compares_with_persisted_layout() {
        let mut editor = editor();
        editor.enter_edit_mode();
        editor.set_tool(EditTool::Move);

        drag(&mut editor, "t1", 30.0, 10.0);
        assert!(editor.has_unsaved_changes());
        assert_eq!(editor.layout_of("t1").unwrap().x, 30.0);

        // De vuelta al origen: ya no hay nada que guardar
        drag(&mut editor, "t1", -30.0, -10.0);
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn exit_prompts_only_with_unsaved_changes() {
        let mut editor = editor();
        editor.enter_edit_mode();
        assert_eq!(editor.request_exit(), ExitOutcome::Exited);
        assert!(!editor.is_editing());

        editor.enter_edit_mode();
        editor.set_tool(EditTool::Rotate);
        editor.pointer_down("t2", Point::default());
        assert_eq!(editor.request_exit(), ExitOutcome::ConfirmRequired);
        assert!(editor.is_editing());
    }

    #[test]
    fn declining_confirmation_reverts_layouts() {
        tokio_test::block_on(async {
            let db = Arc::new(MemoryClient::new());
            let repo = seeded_repo(db.clone()).await;
            let mut editor = FloorPlanEditor::load(&repo, Some("patio".into())).await.unwrap();

            editor.enter_edit_mode();
            editor.set_tool(EditTool::Resize);
            editor.pointer_down("t1", Point::new(0.0, 0.0));
            editor.pointer_move(Point::new(-100.0, 40.0));
            editor.pointer_up();
            assert_eq!(editor.layout_of("t1").unwrap().width, 50.0);

            let calls = db.calls();
            editor.confirm_exit(false, &repo).await.unwrap();
            assert!(!editor.is_editing());
            assert_eq!(editor.layout_of("t1").unwrap().width, 80.0);
            assert!(!editor.has_unsaved_changes());
            assert_eq!(db.calls(), calls);
        });
    }

    #[test]
    fn confirming_saves_then_exits() {
        tokio_test::block_on(async {
            let db = Arc::new(MemoryClient::new());
            let repo = seeded_repo(db.clone()).await;
            let mut editor = FloorPlanEditor::load(&repo, Some("patio".into())).await.unwrap();

            editor.enter_edit_mode();
            editor.set_tool(EditTool::Move);
            drag(&mut editor, "t2", 15.0, 25.0);
            editor.set_tool(EditTool::Rotate);
            editor.pointer_down("t1", Point::default());

            assert_eq!(editor.request_exit(), ExitOutcome::ConfirmRequired);
            editor.confirm_exit(true, &repo).await.unwrap();
            assert!(!editor.is_editing());
            assert!(!editor.has_unsaved_changes());

            let t2 = repo.get("t2").await.unwrap();
            assert_eq!((t2.position_x, t2.position_y), (215.0, 25.0));
            assert_eq!(repo.get("t1").await.unwrap().rotation, 45.0);
        });
    }

    #[test]
    fn failed_save_keeps_changes_pending() {
        tokio_test::block_on(async {
            let db = Arc::new(MemoryClient::new());
            let repo = seeded_repo(db.clone()).await;
            let mut editor = FloorPlanEditor::load(&repo, Some("patio".into())).await.unwrap();

            editor.enter_edit_mode();
            editor.set_tool(EditTool::Move);
            drag(&mut editor, "t1", 10.0, 10.0);

            db.fail_writes(true);
            assert!(editor.confirm_exit(true, &repo).await.is_err());
            assert!(editor.is_editing());
            assert!(editor.has_unsaved_changes());
            assert_eq!(editor.layout_of("t1").unwrap().x, 10.0);
            assert_eq!(repo.get("t1").await.unwrap().position_x, 0.0);

            db.fail_writes(false);
            assert_eq!(editor.save(&repo).await.unwrap(), 1);
            assert!(!editor.has_unsaved_changes());
        });
    }
}
