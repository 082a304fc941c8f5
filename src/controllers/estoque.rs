// src/controllers/estoque.rs

use tokio::sync::watch;

use crate::{
    common::search::{LiveSearch, SearchOutcome},
    config::AppState,
    controllers::{Notification, PageCursor},
    middleware::i18n::Locale,
    models::{
        contract::ContractRef,
        inventory::{
            LocationDetail, Material, MaterialDraft, MaterialFilter, MaterialModel, MaterialOverview,
            MaterialTipo, ModelDraft, ModelFilter, ModelSummary, MoveMaterialPayload, Vehicle,
        },
    },
    services::{contract_service::ContractService, inventory_service::InventoryService},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EstoqueTab {
    #[default]
    Materiais,
    Modelos,
}

/// Filtros da aba de materiais (valem só com um modelo selecionado).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialFilters {
    pub serial: String,
    pub tipo: Option<MaterialTipo>,
    pub etiqueta: String,
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Diálogo de movimentação de um material.
pub struct MoveDialog {
    pub material: Material,
    pub current: Option<LocationDetail>,
    pub vehicles: Vec<Vehicle>,
    contract_search: LiveSearch<ContractRef>,
}

impl MoveDialog {
    pub fn contract_results(&self) -> watch::Receiver<SearchOutcome<ContractRef>> {
        self.contract_search.subscribe()
    }
}

pub struct EstoqueController {
    inventory: InventoryService,
    contracts: ContractService,
    locale: Locale,
    debounce: std::time::Duration,
    pub tab: EstoqueTab,

    // Aba de materiais
    pub selected_model: Option<i64>,
    pub material_filters: MaterialFilters,
    pub material_cursor: PageCursor,
    pub materials: Vec<MaterialOverview>,
    pub summary: Vec<ModelSummary>,
    pub models_for_type: Vec<MaterialModel>,
    pub material_modal_open: bool,
    pub editing_material: Option<Material>,

    // Aba de modelos
    pub model_filter: ModelFilter,
    pub model_cursor: PageCursor,
    pub models: Vec<MaterialModel>,
    pub model_modal_open: bool,
    pub editing_model: Option<MaterialModel>,

    pub move_dialog: Option<MoveDialog>,
    pub notification: Option<Notification>,
}

impl EstoqueController {
    pub fn new(app_state: &AppState, locale: Locale) -> Self {
        Self {
            inventory: app_state.inventory_service.clone(),
            contracts: app_state.contract_service.clone(),
            locale,
            debounce: app_state.config.search_debounce,
            tab: EstoqueTab::default(),
            selected_model: None,
            material_filters: MaterialFilters::default(),
            material_cursor: PageCursor::default(),
            materials: Vec::new(),
            summary: Vec::new(),
            models_for_type: Vec::new(),
            material_modal_open: false,
            editing_material: None,
            model_filter: ModelFilter::default(),
            model_cursor: PageCursor::default(),
            models: Vec::new(),
            model_modal_open: false,
            editing_model: None,
            move_dialog: None,
            notification: None,
        }
    }

    fn fail(&mut self, context: &str, err: &crate::common::error::AppError) {
        self.notification = Some(Notification::failure(context, err, &self.locale));
    }

    pub async fn switch_tab(&mut self, tab: EstoqueTab) {
        self.tab = tab;
        match tab {
            EstoqueTab::Materiais => self.refresh_materials().await,
            EstoqueTab::Modelos => self.refresh_models().await,
        }
    }

    // ---
    // Materiais
    // ---

    /// Sem modelo selecionado mostra o resumo por modelo; com modelo, a página filtrada.
    pub async fn refresh_materials(&mut self) {
        let Some(id_modelo) = self.selected_model else {
            self.materials.clear();
            match self.inventory.model_summary().await {
                Ok(summary) => self.summary = summary,
                Err(e) => self.fail("Erro ao carregar materiais", &e),
            }
            return;
        };

        let filter = MaterialFilter {
            id_modelo,
            serial: non_blank(&self.material_filters.serial),
            tipo: self.material_filters.tipo,
            etiqueta: non_blank(&self.material_filters.etiqueta),
        };

        match self.inventory.list_materials(&filter, self.material_cursor.request()).await {
            Ok(page) => {
                self.material_cursor.absorb(&page);
                self.materials = page.items;
            }
            Err(e) => {
                self.materials.clear();
                self.fail("Erro ao carregar materiais", &e);
            }
        }
    }

    pub async fn select_model(&mut self, id_modelo: Option<i64>) {
        self.selected_model = id_modelo;
        self.material_cursor.reset();
        self.refresh_materials().await;
    }

    pub async fn set_material_filters(&mut self, filters: MaterialFilters) {
        let type_changed = filters.tipo != self.material_filters.tipo;
        self.material_filters = filters;
        if type_changed {
            self.load_models_for_type().await;
        }
        self.material_cursor.reset();
        self.refresh_materials().await;
    }

    pub async fn go_to_material_page(&mut self, page: i64) {
        if self.material_cursor.go_to(page) {
            self.refresh_materials().await;
        }
    }

    async fn load_models_for_type(&mut self) {
        match self.inventory.models_for_type(self.material_filters.tipo).await {
            Ok(models) => self.models_for_type = models,
            Err(e) => self.fail("Erro ao carregar modelos", &e),
        }
    }

    pub fn open_new_material(&mut self) {
        self.editing_material = None;
        self.material_modal_open = true;
    }

    pub fn open_edit_material(&mut self, material: Material) {
        self.editing_material = Some(material);
        self.material_modal_open = true;
    }

    pub fn close_material_modal(&mut self) {
        self.material_modal_open = false;
        self.editing_material = None;
    }

    pub async fn save_material(&mut self, draft: MaterialDraft) {
        let result = match &self.editing_material {
            Some(material) => self
                .inventory
                .update_material(material.id, &draft)
                .await
                .map(|_| "Material atualizado com sucesso!"),
            None => self
                .inventory
                .create_material(&draft)
                .await
                .map(|_| "Material cadastrado com sucesso!"),
        };

        match result {
            Ok(message) => {
                self.notification = Some(Notification::success(message));
                self.close_material_modal();
                self.refresh_materials().await;
            }
            Err(e) => self.fail("Erro ao salvar material", &e),
        }
    }

    pub async fn delete_material(&mut self, material_id: i64) {
        match self.inventory.delete_material(material_id).await {
            Ok(()) => {
                self.notification = Some(Notification::success("Material excluído com sucesso!"));
                self.refresh_materials().await;
            }
            Err(e) => self.fail("Erro ao excluir material", &e),
        }
    }

    // ---
    // Modelos
    // ---

    pub async fn refresh_models(&mut self) {
        match self.inventory.list_models(&self.model_filter, self.model_cursor.request()).await {
            Ok(page) => {
                self.model_cursor.absorb(&page);
                self.models = page.items;
            }
            Err(e) => {
                self.models.clear();
                self.fail("Erro ao carregar modelos", &e);
            }
        }
    }

    pub async fn set_model_filter(&mut self, nome: &str, marca: &str) {
        self.model_filter = ModelFilter { nome: non_blank(nome), marca: non_blank(marca) };
        self.model_cursor.reset();
        self.refresh_models().await;
    }

    pub async fn go_to_model_page(&mut self, page: i64) {
        if self.model_cursor.go_to(page) {
            self.refresh_models().await;
        }
    }

    pub fn open_model_modal(&mut self, model: Option<MaterialModel>) {
        self.editing_model = model;
        self.model_modal_open = true;
    }

    pub async fn save_model(&mut self, draft: ModelDraft) {
        let result = match &self.editing_model {
            Some(model) => self
                .inventory
                .update_model(model.id, &draft)
                .await
                .map(|_| "Modelo atualizado com sucesso!"),
            None => self
                .inventory
                .create_model(&draft)
                .await
                .map(|_| "Modelo cadastrado com sucesso!"),
        };

        match result {
            Ok(message) => {
                self.notification = Some(Notification::success(message));
                self.model_modal_open = false;
                self.editing_model = None;
                self.refresh_models().await;
            }
            Err(e) => self.fail("Erro ao salvar modelo", &e),
        }
    }

    pub async fn delete_model(&mut self, model_id: i64) {
        match self.inventory.delete_model(model_id).await {
            Ok(()) => {
                self.notification = Some(Notification::success("Modelo excluído com sucesso!"));
                self.refresh_models().await;
            }
            Err(e) => self.fail("Erro ao excluir modelo", &e),
        }
    }

    // ---
    // Movimentação
    // ---

    /// Abre o diálogo com a localização atual (material legado ganha o registro "empresa").
    pub async fn open_move_dialog(&mut self, material: Material) {
        let current = match self.inventory.resolve_current_location(material.id).await {
            Ok(detail) => Some(detail),
            Err(e) => {
                self.fail("Erro ao carregar localização", &e);
                None
            }
        };
        let vehicles = match self.inventory.list_vehicles().await {
            Ok(vehicles) => vehicles,
            Err(e) => {
                self.fail("Erro ao carregar veículos", &e);
                Vec::new()
            }
        };

        self.move_dialog = Some(MoveDialog {
            material,
            current,
            vehicles,
            contract_search: LiveSearch::new(self.debounce, self.locale.clone()),
        });
    }

    /// Tecla no campo de PPPoE do diálogo.
    pub fn search_move_contracts(&mut self, term: &str) {
        let Some(dialog) = self.move_dialog.as_mut() else {
            return;
        };
        let contracts = self.contracts.clone();
        dialog
            .contract_search
            .input(term, move |term| async move { contracts.search_by_pppoe(&term).await });
    }

    pub async fn confirm_move(&mut self, payload: MoveMaterialPayload) {
        let Some(material_id) = self.move_dialog.as_ref().map(|d| d.material.id) else {
            return;
        };

        let result = match payload.target() {
            Ok(target) => self.inventory.move_material(material_id, target).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(_) => {
                self.notification = Some(Notification::success("Material movido com sucesso!"));
                self.move_dialog = None;
                self.refresh_materials().await;
            }
            Err(e) => self.fail("Erro ao mover material", &e),
        }
    }

    pub fn close_move_dialog(&mut self) {
        self.move_dialog = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, time::Duration};

    use crate::{
        config::{Backend, Config},
        db::memory::MemoryBackend,
        models::inventory::LocationKind,
    };

    async fn setup() -> (EstoqueController, Arc<MemoryBackend>) {
        let store = Arc::new(MemoryBackend::new());
        let state = AppState::from_backend(Config::for_tests(), Backend::memory(store.clone()));
        (EstoqueController::new(&state, Locale::default()), store)
    }

    fn draft(serial: &str, id_modelo: i64) -> MaterialDraft {
        MaterialDraft {
            serialnb: serial.into(),
            tipo: MaterialTipo::Onu,
            id_modelo: Some(id_modelo),
            etiqueta: None,
            observacoes: None,
        }
    }

    #[tokio::test]
    async fn summary_without_model_then_page_with_model() {
        let (mut ctrl, _) = setup().await;
        ctrl.save_model(ModelDraft { nome: "F601".into(), marca: "ZTE".into() }).await;
        let model_id = ctrl.models[0].id;

        for i in 0..12 {
            ctrl.save_material(draft(&format!("ZTEG{:04}", i), model_id)).await;
        }
        assert_eq!(ctrl.notification, Some(Notification::success("Material cadastrado com sucesso!")));
        assert_eq!(ctrl.summary[0].quantidade, 12);

        ctrl.select_model(Some(model_id)).await;
        assert_eq!(ctrl.material_cursor.total_pages, 2);
        assert_eq!(ctrl.materials.len(), 10);
        assert!(ctrl.materials.iter().all(|m| m.localizacao_label == "Empresa"));

        ctrl.go_to_material_page(2).await;
        assert_eq!(ctrl.materials.len(), 2);

        ctrl.set_material_filters(MaterialFilters { serial: "0011".into(), ..Default::default() }).await;
        assert_eq!(ctrl.material_cursor.page, 1);
        assert_eq!(ctrl.materials.len(), 1);
    }

    #[tokio::test]
    async fn invalid_material_keeps_modal_open() {
        let (mut ctrl, _) = setup().await;
        ctrl.open_new_material();
        ctrl.save_material(draft("", 1)).await;

        assert!(ctrl.material_modal_open);
        assert!(ctrl.notification.as_ref().is_some_and(Notification::is_error));
    }

    #[tokio::test]
    async fn move_dialog_moves_to_vehicle() {
        let (mut ctrl, store) = setup().await;
        let vehicle = store.add_vehicle("ABC1D23").await;
        let material = store.add_material("LEGADO01", MaterialTipo::Roteador, None).await;

        ctrl.open_move_dialog(material.clone()).await;
        let dialog = ctrl.move_dialog.as_ref().unwrap();
        assert_eq!(dialog.current.as_ref().unwrap().record.localizacao_tipo, LocationKind::Empresa);
        assert_eq!(dialog.vehicles.len(), 1);

        ctrl.confirm_move(MoveMaterialPayload {
            localizacao_tipo: LocationKind::Veiculo,
            veiculo_id: Some(vehicle.id),
            contrato_id: None,
        })
        .await;
        assert!(ctrl.move_dialog.is_none());

        let current = ctrl.inventory.current_location(material.id).await.unwrap().unwrap();
        assert_eq!(current.record.veiculo_id, Some(vehicle.id));
        assert_eq!(current.record.contrato_id, None);
    }

    #[tokio::test]
    async fn move_to_vehicle_without_reference_is_refused() {
        let (mut ctrl, store) = setup().await;
        let material = store.add_material("LEGADO02", MaterialTipo::Onu, None).await;
        ctrl.open_move_dialog(material).await;

        ctrl.confirm_move(MoveMaterialPayload {
            localizacao_tipo: LocationKind::Veiculo,
            veiculo_id: None,
            contrato_id: None,
        })
        .await;
        assert!(ctrl.move_dialog.is_some());
        assert!(ctrl.notification.as_ref().is_some_and(Notification::is_error));
    }

    #[tokio::test(start_paused = true)]
    async fn contract_search_in_move_dialog_is_debounced() {
        let (mut ctrl, store) = setup().await;
        store.add_contract(None, Some("joao01"), None, false).await;
        store.add_contract(None, Some("maria01"), None, false).await;
        let material = store.add_material("ONU9", MaterialTipo::Onu, None).await;
        ctrl.open_move_dialog(material).await;
        let mut rx = ctrl.move_dialog.as_ref().unwrap().contract_results();

        ctrl.search_move_contracts("jo");
        tokio::time::sleep(Duration::from_millis(100)).await;
        ctrl.search_move_contracts("joao");

        rx.changed().await.unwrap();
        let outcome = rx.borrow().clone();
        assert_eq!(outcome.term, "joao");
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].pppoe.as_deref(), Some("joao01"));
    }
}
