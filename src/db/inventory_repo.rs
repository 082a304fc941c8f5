// src/db/inventory_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::{
        error::AppError,
        pagination::{Page, PageRequest},
    },
    db::{
        query::TableQuery,
        tables::{InventoryTable, LocationTable},
    },
    models::inventory::{
        LocationDetail, LocationRecord, LocationTarget, Material, MaterialDraft, MaterialFilter,
        MaterialModel, MaterialTipo, ModelDraft, ModelFilter, ModelSummary, Vehicle,
    },
};

// Localização com a placa/PPPoE do destino.
const LOCATION_DETAIL_SELECT: &str = r#"
    SELECT l.id, l.material_id, l.localizacao_tipo, l.veiculo_id, l.contrato_id, l.empresa,
           l.data_atualizacao, v.placa AS veiculo_placa, c.pppoe AS contrato_pppoe
    FROM localizacao_materiais l
    LEFT JOIN veiculos v ON v.id = l.veiculo_id
    LEFT JOIN contratos c ON c.id = l.contrato_id
    WHERE l.material_id = $1
    ORDER BY l.data_atualizacao DESC, l.id DESC
"#;

// Mesmo desempate do registro único: maior data, depois maior id.
const LATEST_LOCATIONS_SELECT: &str = r#"
    SELECT DISTINCT ON (l.material_id)
           l.id, l.material_id, l.localizacao_tipo, l.veiculo_id, l.contrato_id, l.empresa,
           l.data_atualizacao, v.placa AS veiculo_placa, c.pppoe AS contrato_pppoe
    FROM localizacao_materiais l
    LEFT JOIN veiculos v ON v.id = l.veiculo_id
    LEFT JOIN contratos c ON c.id = l.contrato_id
    WHERE l.material_id = ANY($1)
    ORDER BY l.material_id, l.data_atualizacao DESC, l.id DESC
"#;

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn apply_material_filter<'a>(query: TableQuery<'a>, filter: &MaterialFilter) -> TableQuery<'a> {
        query
            .eq("id_modelo", filter.id_modelo)
            .ilike("serialnb", filter.serial.as_deref())
            .eq_opt("tipo", filter.tipo)
            .ilike("etiqueta", filter.etiqueta.as_deref())
    }

    fn apply_model_filter<'a>(query: TableQuery<'a>, filter: &ModelFilter) -> TableQuery<'a> {
        query
            .ilike("nome", filter.nome.as_deref())
            .ilike("marca", filter.marca.as_deref())
    }
}

#[async_trait]
impl InventoryTable for InventoryRepository {
    async fn list_materials(
        &self,
        filter: &MaterialFilter,
        page: PageRequest,
    ) -> Result<Page<Material>, AppError> {
        let total = Self::apply_material_filter(TableQuery::new("SELECT COUNT(*) FROM materiais"), filter)
            .into_builder()
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let items = Self::apply_material_filter(
            TableQuery::new(
                "SELECT id, serialnb, tipo, id_modelo, etiqueta, observacoes, created_at FROM materiais",
            ),
            filter,
        )
        .order_by("created_at DESC, id DESC")
        .page(page)
        .into_builder()
        .build_query_as::<Material>()
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, page, total))
    }

    async fn model_summary(&self) -> Result<Vec<ModelSummary>, AppError> {
        // O tipo exibido é o do material mais antigo do modelo.
        let summary = sqlx::query_as::<_, ModelSummary>(
            r#"
            SELECT m.id, m.nome, m.marca,
                   COUNT(mat.id) AS quantidade,
                   (ARRAY_AGG(mat.tipo ORDER BY mat.created_at, mat.id))[1] AS tipo
            FROM modelo_materiais m
            INNER JOIN materiais mat ON mat.id_modelo = m.id
            GROUP BY m.id, m.nome, m.marca
            ORDER BY m.nome
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(summary)
    }

    async fn find_material(&self, material_id: i64) -> Result<Option<Material>, AppError> {
        let material = sqlx::query_as::<_, Material>(
            "SELECT id, serialnb, tipo, id_modelo, etiqueta, observacoes, created_at FROM materiais WHERE id = $1",
        )
        .bind(material_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(material)
    }

    async fn search_materials(&self, serial: &str, limit: i64) -> Result<Vec<Material>, AppError> {
        let materials = TableQuery::new(
            "SELECT id, serialnb, tipo, id_modelo, etiqueta, observacoes, created_at FROM materiais",
        )
        .ilike("serialnb", Some(serial))
        .order_by("serialnb")
        .limit(limit)
        .into_builder()
        .build_query_as::<Material>()
        .fetch_all(&self.pool)
        .await?;
        Ok(materials)
    }

    async fn insert_material(&self, draft: &MaterialDraft) -> Result<Material, AppError> {
        let material = sqlx::query_as::<_, Material>(
            r#"
            INSERT INTO materiais (serialnb, tipo, id_modelo, etiqueta, observacoes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, serialnb, tipo, id_modelo, etiqueta, observacoes, created_at
            "#,
        )
        .bind(draft.serialnb.trim())
        .bind(draft.tipo)
        .bind(draft.id_modelo)
        .bind(draft.etiqueta.as_deref())
        .bind(draft.observacoes.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(material)
    }

    async fn update_material(
        &self,
        material_id: i64,
        draft: &MaterialDraft,
    ) -> Result<Option<Material>, AppError> {
        let material = sqlx::query_as::<_, Material>(
            r#"
            UPDATE materiais
            SET serialnb = $2, tipo = $3, id_modelo = $4, etiqueta = $5, observacoes = $6
            WHERE id = $1
            RETURNING id, serialnb, tipo, id_modelo, etiqueta, observacoes, created_at
            "#,
        )
        .bind(material_id)
        .bind(draft.serialnb.trim())
        .bind(draft.tipo)
        .bind(draft.id_modelo)
        .bind(draft.etiqueta.as_deref())
        .bind(draft.observacoes.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(material)
    }

    async fn delete_material(&self, material_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM materiais WHERE id = $1")
            .bind(material_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_models(
        &self,
        filter: &ModelFilter,
        page: PageRequest,
    ) -> Result<Page<MaterialModel>, AppError> {
        let total = Self::apply_model_filter(TableQuery::new("SELECT COUNT(*) FROM modelo_materiais"), filter)
            .into_builder()
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let items = Self::apply_model_filter(
            TableQuery::new("SELECT id, nome, marca, created_at FROM modelo_materiais"),
            filter,
        )
        .order_by("nome, id")
        .page(page)
        .into_builder()
        .build_query_as::<MaterialModel>()
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(items, page, total))
    }

    async fn all_models(&self) -> Result<Vec<MaterialModel>, AppError> {
        let models = sqlx::query_as::<_, MaterialModel>(
            "SELECT id, nome, marca, created_at FROM modelo_materiais ORDER BY nome, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(models)
    }

    async fn find_models(&self, model_ids: &[i64]) -> Result<Vec<MaterialModel>, AppError> {
        if model_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = sqlx::query_as::<_, MaterialModel>(
            "SELECT id, nome, marca, created_at FROM modelo_materiais WHERE id = ANY($1) ORDER BY nome, id",
        )
        .bind(model_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(models)
    }

    async fn models_used_by(&self, tipo: MaterialTipo) -> Result<Vec<MaterialModel>, AppError> {
        let models = sqlx::query_as::<_, MaterialModel>(
            r#"
            SELECT m.id, m.nome, m.marca, m.created_at
            FROM modelo_materiais m
            WHERE m.id IN (SELECT DISTINCT id_modelo FROM materiais WHERE tipo = $1 AND id_modelo IS NOT NULL)
            ORDER BY m.nome, m.id
            "#,
        )
        .bind(tipo)
        .fetch_all(&self.pool)
        .await?;
        Ok(models)
    }

    async fn insert_model(&self, draft: &ModelDraft) -> Result<MaterialModel, AppError> {
        let model = sqlx::query_as::<_, MaterialModel>(
            "INSERT INTO modelo_materiais (nome, marca) VALUES ($1, $2) RETURNING id, nome, marca, created_at",
        )
        .bind(draft.nome.trim())
        .bind(draft.marca.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(model)
    }

    async fn update_model(&self, model_id: i64, draft: &ModelDraft) -> Result<Option<MaterialModel>, AppError> {
        let model = sqlx::query_as::<_, MaterialModel>(
            r#"
            UPDATE modelo_materiais SET nome = $2, marca = $3
            WHERE id = $1
            RETURNING id, nome, marca, created_at
            "#,
        )
        .bind(model_id)
        .bind(draft.nome.trim())
        .bind(draft.marca.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(model)
    }

    async fn delete_model(&self, model_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM modelo_materiais WHERE id = $1")
            .bind(model_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT id, placa, nome FROM veiculos ORDER BY placa")
            .fetch_all(&self.pool)
            .await?;
        Ok(vehicles)
    }
}

#[async_trait]
impl LocationTable for InventoryRepository {
    async fn latest_location(&self, material_id: i64) -> Result<Option<LocationDetail>, AppError> {
        let sql = format!("{} LIMIT 1", LOCATION_DETAIL_SELECT);
        let detail = sqlx::query_as::<_, LocationDetail>(&sql)
            .bind(material_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(detail)
    }

    async fn latest_locations(&self, material_ids: &[i64]) -> Result<Vec<LocationDetail>, AppError> {
        if material_ids.is_empty() {
            return Ok(Vec::new());
        }
        let details = sqlx::query_as::<_, LocationDetail>(LATEST_LOCATIONS_SELECT)
            .bind(material_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(details)
    }

    async fn location_history(&self, material_id: i64) -> Result<Vec<LocationDetail>, AppError> {
        let history = sqlx::query_as::<_, LocationDetail>(LOCATION_DETAIL_SELECT)
            .bind(material_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(history)
    }

    async fn insert_location(
        &self,
        material_id: i64,
        target: LocationTarget,
    ) -> Result<LocationRecord, AppError> {
        let record = sqlx::query_as::<_, LocationRecord>(
            r#"
            INSERT INTO localizacao_materiais (material_id, localizacao_tipo, veiculo_id, contrato_id, empresa)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, material_id, localizacao_tipo, veiculo_id, contrato_id, empresa, data_atualizacao
            "#,
        )
        .bind(material_id)
        .bind(target.kind())
        .bind(target.veiculo_id())
        .bind(target.contrato_id())
        .bind(target.is_empresa())
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    async fn insert_location_if_absent(
        &self,
        material_id: i64,
        target: LocationTarget,
    ) -> Result<Option<LocationRecord>, AppError> {
        let record = sqlx::query_as::<_, LocationRecord>(
            r#"
            INSERT INTO localizacao_materiais (material_id, localizacao_tipo, veiculo_id, contrato_id, empresa)
            SELECT $1, $2, $3, $4, $5
            WHERE NOT EXISTS (SELECT 1 FROM localizacao_materiais WHERE material_id = $1)
            RETURNING id, material_id, localizacao_tipo, veiculo_id, contrato_id, empresa, data_atualizacao
            "#,
        )
        .bind(material_id)
        .bind(target.kind())
        .bind(target.veiculo_id())
        .bind(target.contrato_id())
        .bind(target.is_empresa())
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }
}
