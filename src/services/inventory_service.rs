// src/services/inventory_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
        search::SEARCH_RESULT_LIMIT,
    },
    db::tables::{InventoryTable, LocationTable},
    models::inventory::{
        location_label, LocationDetail, LocationRecord, LocationTarget, Material, MaterialDraft,
        MaterialFilter, MaterialModel, MaterialOverview, MaterialTipo, ModelDraft, ModelFilter,
        ModelSummary, Vehicle,
    },
};

#[derive(Clone)]
pub struct InventoryService {
    materials: Arc<dyn InventoryTable>,
    locations: Arc<dyn LocationTable>,
}

impl InventoryService {
    pub fn new(materials: Arc<dyn InventoryTable>, locations: Arc<dyn LocationTable>) -> Self {
        Self { materials, locations }
    }

    async fn require_material(&self, material_id: i64) -> Result<Material, AppError> {
        self.materials
            .find_material(material_id)
            .await?
            .ok_or(AppError::MaterialNotFound(material_id))
    }

    // ---
    // Materiais
    // ---

    /// Página de materiais de um modelo, cada um com o modelo e a localização atual.
    pub async fn list_materials(
        &self,
        filter: &MaterialFilter,
        page: PageRequest,
    ) -> Result<Page<MaterialOverview>, AppError> {
        let page = self.materials.list_materials(filter, page.normalized()).await?;

        let mut model_ids: Vec<i64> = page.items.iter().filter_map(|m| m.id_modelo).collect();
        model_ids.sort_unstable();
        model_ids.dedup();
        let models = self.materials.find_models(&model_ids).await?;

        let material_ids: Vec<i64> = page.items.iter().map(|m| m.id).collect();
        let locations = self.locations.latest_locations(&material_ids).await?;

        let overviews = page
            .items
            .iter()
            .map(|material| {
                let localizacao = locations.iter().find(|l| l.record.material_id == material.id).cloned();
                MaterialOverview {
                    material: material.clone(),
                    modelo: models.iter().find(|m| Some(m.id) == material.id_modelo).cloned(),
                    localizacao_label: location_label(localizacao.as_ref()),
                    localizacao,
                }
            })
            .collect();

        Ok(Page {
            items: overviews,
            page: page.page,
            items_per_page: page.items_per_page,
            total: page.total,
            total_pages: page.total_pages,
        })
    }

    pub async fn model_summary(&self) -> Result<Vec<ModelSummary>, AppError> {
        self.materials.model_summary().await
    }

    /// Cadastra o material e registra a localização inicial (empresa).
    pub async fn create_material(&self, draft: &MaterialDraft) -> Result<Material, AppError> {
        draft.validate()?;

        let material = self.materials.insert_material(draft).await?;

        // O material fica salvo mesmo se a localização falhar;
        // a leitura legada cria o registro depois.
        if let Err(e) = self.ensure_initial_location(material.id).await {
            tracing::warn!(
                "Material {} cadastrado, mas a localização inicial falhou: {:?}",
                material.id,
                e
            );
        }

        tracing::info!("Material {} ({}) cadastrado", material.id, material.serialnb);
        Ok(material)
    }

    pub async fn update_material(&self, material_id: i64, draft: &MaterialDraft) -> Result<Material, AppError> {
        draft.validate()?;
        self.materials
            .update_material(material_id, draft)
            .await?
            .ok_or(AppError::MaterialNotFound(material_id))
    }

    pub async fn delete_material(&self, material_id: i64) -> Result<(), AppError> {
        if !self.materials.delete_material(material_id).await? {
            return Err(AppError::MaterialNotFound(material_id));
        }
        tracing::info!("Material {} excluído", material_id);
        Ok(())
    }

    /// Busca por número de série para o seletor de ONU da instalação.
    pub async fn search_by_serial(&self, term: &str) -> Result<Vec<Material>, AppError> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }
        self.materials.search_materials(term, SEARCH_RESULT_LIMIT).await
    }

    // ---
    // Modelos
    // ---

    pub async fn list_models(
        &self,
        filter: &ModelFilter,
        page: PageRequest,
    ) -> Result<Page<MaterialModel>, AppError> {
        self.materials.list_models(filter, page.normalized()).await
    }

    pub async fn create_model(&self, draft: &ModelDraft) -> Result<MaterialModel, AppError> {
        draft.validate()?;
        self.materials.insert_model(draft).await
    }

    pub async fn update_model(&self, model_id: i64, draft: &ModelDraft) -> Result<MaterialModel, AppError> {
        draft.validate()?;
        self.materials
            .update_model(model_id, draft)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("modelo {}", model_id)))
    }

    pub async fn delete_model(&self, model_id: i64) -> Result<(), AppError> {
        if !self.materials.delete_model(model_id).await? {
            return Err(AppError::NotFound(format!("modelo {}", model_id)));
        }
        Ok(())
    }

    /// Modelos já usados por materiais do tipo; sem nenhum, todos os modelos.
    /// Sem tipo selecionado a lista fica vazia.
    pub async fn models_for_type(&self, tipo: Option<MaterialTipo>) -> Result<Vec<MaterialModel>, AppError> {
        let Some(tipo) = tipo else {
            return Ok(Vec::new());
        };
        let used = self.materials.models_used_by(tipo).await?;
        if used.is_empty() {
            return self.materials.all_models().await;
        }
        Ok(used)
    }

    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        self.materials.list_vehicles().await
    }

    // ---
    // Localização
    // ---

    /// Leitura pura: `None` quando o material não tem histórico.
    pub async fn current_location(&self, material_id: i64) -> Result<Option<LocationDetail>, AppError> {
        self.require_material(material_id).await?;
        self.locations.latest_location(material_id).await
    }

    /// Cria o registro "empresa" se o material ainda não tem nenhum.
    pub async fn ensure_initial_location(&self, material_id: i64) -> Result<Option<LocationRecord>, AppError> {
        let created = self
            .locations
            .insert_location_if_absent(material_id, LocationTarget::Empresa)
            .await?;
        if let Some(record) = &created {
            tracing::debug!("Localização inicial {} criada para o material {}", record.id, material_id);
        }
        Ok(created)
    }

    /// Localização atual para dados legados: material sem histórico ganha o registro
    /// "empresa" na primeira leitura.
    pub async fn resolve_current_location(&self, material_id: i64) -> Result<LocationDetail, AppError> {
        self.require_material(material_id).await?;

        if let Some(current) = self.locations.latest_location(material_id).await? {
            return Ok(current);
        }

        self.ensure_initial_location(material_id).await?;
        self.locations
            .latest_location(material_id)
            .await?
            .ok_or_else(|| AppError::InternalServerError(anyhow::anyhow!(
                "localização inicial do material {} não encontrada após inserção",
                material_id
            )))
    }

    pub async fn location_history(&self, material_id: i64) -> Result<Vec<LocationDetail>, AppError> {
        self.require_material(material_id).await?;
        self.locations.location_history(material_id).await
    }

    pub async fn move_material(&self, material_id: i64, target: LocationTarget) -> Result<LocationRecord, AppError> {
        self.require_material(material_id).await?;
        let record = self.locations.insert_location(material_id, target).await?;
        tracing::info!("Material {} movido para {:?}", material_id, target);
        Ok(record)
    }
}
