// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        tables::{AgendaTable, ContractTable, InstallationTable, InventoryTable, LocationTable},
        AgendaRepository, ContractRepository, InventoryRepository,
    },
    services::{
        agenda_service::AgendaService, auth::AuthService, contract_service::ContractService,
        document_service::DocumentService, installation_service::InstallationService,
        inventory_service::InventoryService,
    },
};

/// Dados da prestadora impressos nos contratos.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyProfile {
    pub razao_social: String,
    pub nome_fantasia: String,
    pub cnpj: String,
    pub inscricao_estadual: String,
    pub endereco: String,
    pub bairro: String,
    pub cidade: String,
    pub estado: String,
    pub uf: String,
    pub cep: String,
    pub telefone: String,
    pub email: String,
    pub ato_anatel: String,
    pub comarca: String,
    pub representante_nome: Option<String>,
    pub representante_cpf: Option<String>,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            razao_social: "NOSTRANET TELECOM LTDA".into(),
            nome_fantasia: "NOSTRANET TELECOM".into(),
            cnpj: "56.417.910/0001-29".into(),
            inscricao_estadual: "250/0020066".into(),
            endereco: "Av. Pé Rizziere Delai, nº 625".into(),
            bairro: "Centro".into(),
            cidade: "Três Cachoeiras".into(),
            estado: "Rio Grande do Sul".into(),
            uf: "RS".into(),
            cep: "95580-000".into(),
            telefone: "(51) 9922-0496".into(),
            email: "nostranet@nostranet.com.br".into(),
            ato_anatel: "Ato nº. 3423 de 14 de maio de 2021".into(),
            comarca: "Arroio do Sal/RS".into(),
            representante_nome: None,
            representante_cpf: None,
        }
    }
}

impl CompanyProfile {
    fn from_env() -> Self {
        let defaults = Self::default();
        let var = |key: &str, default: String| env::var(key).ok().filter(|v| !v.trim().is_empty()).unwrap_or(default);
        Self {
            razao_social: var("COMPANY_RAZAO_SOCIAL", defaults.razao_social),
            nome_fantasia: var("COMPANY_NOME_FANTASIA", defaults.nome_fantasia),
            cnpj: var("COMPANY_CNPJ", defaults.cnpj),
            inscricao_estadual: var("COMPANY_IE", defaults.inscricao_estadual),
            endereco: var("COMPANY_ENDERECO", defaults.endereco),
            bairro: var("COMPANY_BAIRRO", defaults.bairro),
            cidade: var("COMPANY_CIDADE", defaults.cidade),
            estado: var("COMPANY_ESTADO", defaults.estado),
            uf: var("COMPANY_UF", defaults.uf),
            cep: var("COMPANY_CEP", defaults.cep),
            telefone: var("COMPANY_TELEFONE", defaults.telefone),
            email: var("COMPANY_EMAIL", defaults.email),
            ato_anatel: var("COMPANY_ATO_ANATEL", defaults.ato_anatel),
            comarca: var("COMPANY_COMARCA", defaults.comarca),
            representante_nome: env::var("COMPANY_REPRESENTANTE_NOME").ok(),
            representante_cpf: env::var("COMPANY_REPRESENTANTE_CPF").ok(),
        }
    }
}

/// Parâmetros fixos dos documentos de contrato.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSettings {
    pub company: CompanyProfile,
    pub download_mbps: u32,
    pub upload_mbps: u32,
    pub fonts_dir: String,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            company: CompanyProfile::default(),
            download_mbps: 300,
            upload_mbps: 150,
            fonts_dir: "./fonts".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub search_debounce: Duration,
    pub documents: DocumentSettings,
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ({}): {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_audience: env::var("JWT_AUDIENCE").ok().filter(|a| !a.trim().is_empty()),
            server_addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            search_debounce: Duration::from_millis(parse_var("SEARCH_DEBOUNCE_MS", 300)?),
            documents: DocumentSettings {
                company: CompanyProfile::from_env(),
                download_mbps: parse_var("PLAN_DOWNLOAD_MBPS", 300)?,
                upload_mbps: parse_var("PLAN_UPLOAD_MBPS", 150)?,
                fonts_dir: env::var("FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string()),
            },
        })
    }
}

// O estado compartilhado acessível em todos os handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub contract_service: ContractService,
    pub inventory_service: InventoryService,
    pub agenda_service: AgendaService,
    pub installation_service: InstallationService,
    pub document_service: DocumentService,
}

/// As tabelas por trás dos serviços (Postgres em produção, memória nos testes).
#[derive(Clone)]
pub struct Backend {
    pub contracts: Arc<dyn ContractTable>,
    pub inventory: Arc<dyn InventoryTable>,
    pub locations: Arc<dyn LocationTable>,
    pub agenda: Arc<dyn AgendaTable>,
    pub installations: Arc<dyn InstallationTable>,
}

impl Backend {
    pub fn postgres(pool: PgPool) -> Self {
        let inventory = Arc::new(InventoryRepository::new(pool.clone()));
        let agenda = Arc::new(AgendaRepository::new(pool.clone()));
        Self {
            contracts: Arc::new(ContractRepository::new(pool)),
            inventory: inventory.clone(),
            locations: inventory,
            agenda: agenda.clone(),
            installations: agenda,
        }
    }
}

impl AppState {
    /// Conecta ao banco e monta o estado. Devolve também a pool para as migrações.
    pub async fn new(config: Config) -> anyhow::Result<(Self, PgPool)> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let state = Self::from_backend(config, Backend::postgres(db_pool.clone()));
        Ok((state, db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_backend(config: Config, backend: Backend) -> Self {
        let auth_service = AuthService::new(config.jwt_secret.clone(), config.jwt_audience.clone());
        let contract_service = ContractService::new(backend.contracts.clone());
        let inventory_service = InventoryService::new(backend.inventory.clone(), backend.locations.clone());
        let agenda_service = AgendaService::new(backend.agenda.clone(), contract_service.clone());
        let installation_service = InstallationService::new(
            backend.agenda.clone(),
            backend.installations.clone(),
            backend.contracts.clone(),
            backend.inventory.clone(),
        );
        let document_service = DocumentService::new(config.documents.clone());

        Self {
            config: Arc::new(config),
            auth_service,
            contract_service,
            inventory_service,
            agenda_service,
            installation_service,
            document_service,
        }
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            jwt_secret: "segredo-de-teste".into(),
            jwt_audience: None,
            server_addr: "127.0.0.1:0".into(),
            db_max_connections: 1,
            search_debounce: Duration::from_millis(300),
            documents: DocumentSettings::default(),
        }
    }
}

#[cfg(test)]
impl Backend {
    pub fn memory(store: Arc<crate::db::memory::MemoryBackend>) -> Self {
        Self {
            contracts: store.clone(),
            inventory: store.clone(),
            locations: store.clone(),
            agenda: store.clone(),
            installations: store,
        }
    }
}
