// src/services/contract_templates.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    config::{CompanyProfile, DocumentSettings},
    models::contract::ContractDocumentData,
};

const CONTRACT_NAME: &str =
    "CONTRATO DE PRESTAÇÃO DE SERVIÇOS DE COMUNICAÇÃO MULTIMÍDIA, SERVIÇO DE VALOR ADICIONADO, LOCAÇÃO E OUTRAS AVENÇAS";
const SIGNATURE_LINE: &str = "_______________________________________________";
const HAND_FILL: &str = "________";
const FIDELITY_MONTHS: u32 = 12;
const MONTHLY_BENEFIT: Decimal = Decimal::from_parts(5000, 0, 0, false, 2);
const MONTH_WORDS: [&str; 12] = [
    "um", "dois", "três", "quatro", "cinco", "seis", "sete", "oito", "nove", "dez", "onze", "doze",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Adesao,
    Permanencia,
    Rescisao,
}

impl DocumentKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "adesao" => Some(DocumentKind::Adesao),
            "permanencia" => Some(DocumentKind::Permanencia),
            "rescisao" => Some(DocumentKind::Rescisao),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Adesao => "adesao",
            DocumentKind::Permanencia => "permanencia",
            DocumentKind::Rescisao => "rescisao",
        }
    }
}

/// Trecho do documento. O HTML e o PDF são montados a partir da mesma lista.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(String),
    Subtitle(String),
    Heading(String),
    Paragraph(String),
    /// Parágrafo com rótulo em negrito no início.
    Clause { label: String, text: String },
    /// Linhas sem espaçamento entre si (fichas de dados, tabelas simples).
    Lines(Vec<String>),
    Centered(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContractDocument {
    pub kind: DocumentKind,
    pub title: String,
    pub blocks: Vec<Block>,
}

impl ContractDocument {
    pub fn to_html(&self) -> String {
        let mut html = String::from(
            "<div style=\"font-family: 'Times New Roman', Times, serif; line-height: 1.2; text-align: justify;\">\n",
        );
        for block in &self.blocks {
            match block {
                Block::Title(text) => html.push_str(&format!(
                    "<h1 style=\"text-align: center; font-weight: bold;\">{}</h1>\n",
                    escape_html(text)
                )),
                Block::Subtitle(text) => html.push_str(&format!(
                    "<p style=\"text-align: center;\">{}</p>\n",
                    escape_html(text)
                )),
                Block::Heading(text) => {
                    html.push_str(&format!("<h2 style=\"font-weight: bold;\">{}</h2>\n", escape_html(text)))
                }
                Block::Paragraph(text) => html.push_str(&format!(
                    "<p style=\"text-align: justify;\">{}</p>\n",
                    escape_html(text)
                )),
                Block::Clause { label, text } => html.push_str(&format!(
                    "<p style=\"text-align: justify;\"><strong>{}</strong> {}</p>\n",
                    escape_html(label),
                    escape_html(text)
                )),
                Block::Lines(lines) => html.push_str(&format!(
                    "<p style=\"text-align: justify;\">{}</p>\n",
                    join_lines(lines)
                )),
                Block::Centered(lines) => html.push_str(&format!(
                    "<div style=\"margin-top: 15px; text-align: center;\">{}</div>\n",
                    join_lines(lines)
                )),
            }
        }
        html.push_str("</div>");
        html
    }
}

fn join_lines(lines: &[String]) -> String {
    lines.iter().map(|l| escape_html(l)).collect::<Vec<_>>().join("<br>\n")
}

/// Escapa texto de conteúdo. Aspas e apóstrofos ficam como estão (nomes como D'Ávila).
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Valor em reais no formato brasileiro: `R$ 1.234,50`.
pub fn format_brl(value: Decimal) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if value.is_sign_negative() && !value.is_zero() { "-" } else { "" };
    format!("{}R$ {},{}", sign, grouped, cents)
}

// Campos do assinante já normalizados para impressão.
struct Subscriber {
    name: String,
    cpf: String,
    rg: String,
    address: String,
    bairro: String,
    city: String,
    cep: String,
    email: String,
    phone: String,
    plan_name: String,
    plan_value: String,
    due_day: String,
}

impl Subscriber {
    fn from_data(data: &ContractDocumentData) -> Self {
        let address = match (non_blank(data.endereco.as_deref()), non_blank(data.complemento.as_deref())) {
            (Some(end), Some(comp)) => format!("{} - {}", end, comp),
            (Some(part), None) | (None, Some(part)) => part.to_string(),
            (None, None) => "-".to_string(),
        };
        Self {
            name: or_dash(data.cliente_nome.as_deref()),
            cpf: or_dash(data.cpf_cnpj.as_deref()),
            rg: or_dash(data.rg.as_deref()),
            address,
            bairro: or_dash(data.bairro_nome.as_deref()),
            city: or_dash(data.cidade.as_deref()),
            cep: or_dash(data.cep.as_deref()),
            email: or_dash(data.email.as_deref()),
            phone: or_dash(data.fonewhats.as_deref()),
            plan_name: or_dash(data.plano_nome.as_deref()),
            plan_value: data.plano_valor.map(format_brl).unwrap_or_else(|| "-".to_string()),
            due_day: data.dia_vencimento.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Gera o documento do tipo pedido. Mesma entrada e mesma data, mesmo documento.
pub fn generate(
    kind: DocumentKind,
    data: &ContractDocumentData,
    settings: &DocumentSettings,
    issued_on: NaiveDate,
) -> ContractDocument {
    let subscriber = Subscriber::from_data(data);
    let company = &settings.company;
    let date_line = format!("{}, {}", company.cidade, issued_on.format("%d/%m/%Y"));

    let (title, blocks) = match kind {
        DocumentKind::Adesao => adesao(&subscriber, settings, date_line),
        DocumentKind::Permanencia => permanencia(&subscriber, company, date_line),
        DocumentKind::Rescisao => rescisao(&subscriber, company, date_line),
    };

    ContractDocument { kind, title, blocks }
}

fn signatures(company: &CompanyProfile, subscriber: &Subscriber) -> Block {
    Block::Centered(vec![
        SIGNATURE_LINE.to_string(),
        company.razao_social.clone(),
        String::new(),
        SIGNATURE_LINE.to_string(),
        subscriber.name.clone(),
        format!("CPF/CNPJ: {}", subscriber.cpf),
    ])
}

fn adesao(s: &Subscriber, settings: &DocumentSettings, date_line: String) -> (String, Vec<Block>) {
    let c = &settings.company;
    let title = format!("TERMO DE ADESÃO AO {}", CONTRACT_NAME);
    let blocks = vec![
        Block::Title(title.clone()),
        Block::Paragraph(
            "Por este instrumento particular, o ASSINANTE abaixo qualificado contrata e adere ao Serviço da PRESTADORA:".into(),
        ),
        Block::Heading("DADOS DA PRESTADORA".into()),
        Block::Lines(vec![
            format!("Nome Empresarial: {}", c.razao_social),
            format!("CNPJ: {}", c.cnpj),
            format!("Endereço: {}", c.endereco),
            format!("Bairro: {}", c.bairro),
            format!("Cidade: {}", c.cidade),
            format!("Estado: {}", c.estado),
            format!("CEP: {}", c.cep),
            format!("Telefone: nº {}, disponibilizado o recebimento de ligações a cobrar", c.telefone),
            format!("E-mail: {}", c.email),
        ]),
        Block::Heading("QUALIFICAÇÃO DO ASSINANTE".into()),
        Block::Lines(vec![
            format!("Nome: {}", s.name),
            format!("CPF/CNPJ: {}", s.cpf),
            format!("RG/ID: {}", s.rg),
            format!("Endereço: {}", s.address),
            format!("Bairro: {}", s.bairro),
            format!("Cidade: {}", s.city),
            format!("Estado: {}", c.estado),
            format!("CEP: {}", s.cep),
            format!("Telefone: {}", s.phone),
            format!("E-mail: {}", s.email),
        ]),
        Block::Paragraph(
            "O presente termo é regulamentado pelo Código Brasileiro do Consumidor e pelos Regulamentos referentes aos \
             Serviços de Comunicação Multimídia (SCM) e Serviço de Valor Adicionado (SVA), no qual as opções abaixo \
             determinados são de responsabilidade do ASSINANTE."
                .into(),
        ),
        Block::Heading("Dados Técnicos e Comerciais do Plano de Acesso e Modalidade escolhida:".into()),
        Block::Lines(vec![
            format!("Plano: {}", s.plan_name),
            "Modalidade: ( ) Pré-pago".into(),
            format!("Velocidade máxima de upload: {} Mbps", settings.upload_mbps),
            format!("Velocidade máxima de download: {} Mbps", settings.download_mbps),
            "IP : Fixo ( ) Variável ( )".into(),
            "Prazo Contratual: indeterminado".into(),
            format!("Taxa de instalação com Fidelidade: R$ {}", HAND_FILL),
            format!("Taxa de Instalação sem Fidelidade: R$ {}", HAND_FILL),
            "Equipamentos: Devidamente descrito na OS de instalação.".into(),
            "Equipamentos: ( ) Comodato da Contratada".into(),
            format!("Data de Vencimento: {}", s.due_day),
            format!("Valor sem fidelidade: R$ {}", HAND_FILL),
            format!("Valor com fidelidade: {}", s.plan_value),
            "Fidelidade ( ) Sim ( ) Não".into(),
            "Autoriza o recebimento de mensagem publicitária em seu telefone móvel: ( ) S ( ) N".into(),
            "Autoriza que o documento de cobrança, correspondências e notificações sejam encaminhados por quaisquer \
             meios eletrônicos indicados neste termo (e-mail, SMS, WhatsApp, dentre outros): (x) Sim ( ) Não"
                .into(),
            "Sujeito à multa rescisória em caso de cancelamento antecipado: ( ) Sim ( ) Não".into(),
            format!("Forma de Pagamento: ( )Boleto Bancário ( )Débito Automático Banco {}", HAND_FILL),
        ]),
        Block::Paragraph(
            "Quando não incluídos no Plano de Acesso, o custo da Conexão Simultânea, Ponto de Acesso Adicional, das \
             Horas de Conexão Adicionais (tecnologias distintas e/ou mesma tecnologia, mas fora dos períodos \
             pré-definidos no Plano de Acesso), Franquia Adicional de Tráfego/Bits ou Horas, do Suporte Técnico e as \
             visitas técnicas deverão ser pagas pelo ASSINANTE, juntamente com os pagamentos periódicos de seu Plano \
             de Acesso, com base no número de ocorrências e/ou cálculo efetuado pelo sistema de bilhetagem (aferição e \
             contagem de horas)."
                .into(),
        ),
        Block::Paragraph(format!(
            "O presente Termo de Adesão vigorará enquanto estiver vigente o {}.",
            CONTRACT_NAME
        )),
        Block::Paragraph(
            "O ASSINANTE fica cientificado que a PRESTADORA fiscalizará a regular utilização dos serviços ora \
             contratados, e a violação das normas, caso detectada pela PRESTADORA, implicará aplicação das sanções \
             atinentes à espécie, conforme estipulado no Contrato de Prestação de Serviço aderido."
                .into(),
        ),
        Block::Paragraph(
            "O ASSINANTE declara estar ciente que mesmo que a PRESTADORA forneça todas as condições necessárias para a \
             prestação de serviços, caso os dispositivos de propriedade do ASSINANTE possuam outra versão do protocolo \
             de conexão wireless ou tecnologia inferior aos equipamentos e serviços ofertados pela PRESTADORA, a banda \
             contratada não será integralmente usufruída pelo dispositivo receptor."
                .into(),
        ),
        Block::Paragraph(
            "A PRESTADORA não garante prestação de suporte quando os equipamentos do ASSINANTE não forem compatíveis ou \
             conhecidos pela PRESTADORA ou não possuam os requisitos mínimos necessários para garantir o padrão de \
             qualidade e o desempenho adequado do serviço prestado, tais como, velocidade e disponibilidade, porém não \
             limitado a estas."
                .into(),
        ),
        Block::Paragraph(
            "O ASSINANTE declara estar ciente que nos planos de acesso que seja definida a velocidade de conexão, o seu \
             valor será expresso em Kbps (kilobits por segundo), que caracterizará o máximo possível a ser obtido, \
             alusiva, tão-somente, ao cômodo no qual serão instalados os equipamentos de acesso e, para aferição de da \
             velocidade, o equipamento deverá sempre ser ligado direto na ONU (roteador), via cabo, através de uma de \
             suas portas LAN (REDE) e os demais dispositivos conectados nas portas LAN (REDE) ou no Wifi devem ser \
             desconectados para a correta medição da velocidade."
                .into(),
        ),
        Block::Clause {
            label: "CONDIÇÕES DE DEGRADAÇÃO OU INTERRUPÇÃO DOS SERVIÇOS PRESTADOS:".into(),
            text: "O ASSINANTE tem ciência dos motivos que podem culminar na degradação dos serviços de comunicação \
                   multimídia (SCM) prestados, são eles: (a) Ações da natureza, tais como chuvas, descargas \
                   atmosféricas e outras que configurem força maior; (b) Interferências prejudiciais provocadas por \
                   equipamentos de terceiros; (c) Bloqueio da visada limpa; (d) Casos fortuitos; (e) Interrupção de \
                   energia elétrica; (f) Falhas nos equipamentos e instalações; (g) Rompimento parcial ou total dos \
                   meios de rede; (h) Interrupções por ordem da ANATEL, ordem Judicial ou outra investida com poderes \
                   para tal; (i) outras previstas contratualmente;"
                .into(),
        },
        Block::Clause {
            label: "DECLARAÇÃO DE CONCORDÂNCIA:".into(),
            text: format!(
                "Declaro, para os devidos fins, que são corretos os dados cadastrais e informações por mim prestadas \
                 neste instrumento. Declaro ainda que os documentos apresentados para formalização deste contrato e as \
                 cópias dos documentos entregues à CONTRATADA pertencem a minha pessoa, tendo ciência das sanções \
                 civis e criminais caso prestar declarações falsas, entregar documentos falsos e me passar por \
                 outrem. Declaro estar ciente que a assinatura deste instrumento representa expressa concordância aos \
                 termos e condições do {contrato}, que juntamente com esse TERMO DE ADESÃO formam um só instrumento \
                 de direito, tendo lido e entendido claramente as condições ajustadas para esta contratação. Declaro \
                 ainda que tivesse prévio acesso a todas as informações relativas ao {contrato}, bem como ao Plano de \
                 Serviço por mim contratado, devidamente especificado neste Termo.",
                contrato = CONTRACT_NAME
            ),
        },
        Block::Clause {
            label: "AUTORIZAÇÃO:".into(),
            text: format!(
                "Autorizo o Outorgado (a), {blank}, CPF N° {blank}, a representar-me perante a PRESTADORA para o fim \
                 de solicitar alterações e/ou serviços adicionais, cancelamentos, negociar débitos, solicitar visitas \
                 e reparos, assinar ordens de serviço, termos de contratação e quaisquer solicitações, responder por \
                 mim frente a quaisquer questionamentos que sejam realizados, bem como transigir, firmar compromissos \
                 e dar quitação.",
                blank = HAND_FILL
            ),
        },
        Block::Paragraph(
            "A adesão ao presente Contrato importa na ciência e anuência do ASSINANTE de que o uso de seus dados \
             pessoais (nome, telefone, e-mail) pela PRESTADORA é condição primordial para o fornecimento dos serviços, \
             nos moldes do §3°, do art. 9° da Lei 13.709/18, ao mesmo passo que se aplica ao endereço IP do \
             ASSINANTE, especialmente por se tratar de gestão de dado pessoal decorrente de cumprimento de obrigação \
             legal e regulatória."
                .into(),
        ),
        Block::Paragraph(format!(
            "E por estar de acordo com as cláusulas do presente termo e do {}, parte integrante deste Termo de Adesão, \
             o ASSINANTE aposta sua assinatura abaixo ou o aceita eletronicamente, para que surta todos os seus efeitos \
             legais.",
            CONTRACT_NAME
        )),
        Block::Paragraph(format!(
            "A cópia integral do {} pode ser obtida no Cartório de Registro de Títulos e Documentos da Comarca de {}.",
            CONTRACT_NAME, c.comarca
        )),
        Block::Centered(vec![date_line]),
        signatures(c, s),
    ];
    (title, blocks)
}

/// Tabela da multa: benefício mensal vezes os meses que faltam.
fn penalty_table() -> Vec<String> {
    let mut lines = vec!["PEDIDO DE CANCELAMENTO -------- VALOR TOTAL DA MULTA RESCISÓRIA".to_string()];
    for month in 1..=FIDELITY_MONTHS {
        let remaining = Decimal::from(FIDELITY_MONTHS - month + 1);
        let unit = if month == 1 { "mês" } else { "meses" };
        lines.push(format!(
            "Com {} ({}) {} de uso -------- {}",
            month,
            MONTH_WORDS[(month - 1) as usize],
            unit,
            format_brl(MONTHLY_BENEFIT * remaining)
        ));
    }
    lines
}

fn permanencia(s: &Subscriber, c: &CompanyProfile, date_line: String) -> (String, Vec<Block>) {
    let title = "CONTRATO DE PERMANÊNCIA".to_string();
    let total_benefit = MONTHLY_BENEFIT * Decimal::from(FIDELITY_MONTHS);

    let blocks = vec![
        Block::Title(title.clone()),
        Block::Subtitle(
            "(Vinculado ao Contrato de Prestação de Serviços e ao Termo de Adesão celebrado entre a PRESTADORA e o ASSINANTE)"
                .into(),
        ),
        Block::Paragraph(format!(
            "Por este instrumento, {name}, inscrito no RG de nº {rg}, e no CPF sob o nº {cpf}, residente e domiciliado \
             na {address}, {city} - {uf}, {cep}, Brasil, Bairro {bairro}, na Cidade de {city} do Estado de {estado}, \
             denominado ASSINANTE, que contratou o Serviço de Comunicação Multimídia, Serviço de Valor Adicionado, \
             Locação e Outras Avenças, ofertado por {razao}, nome fantasia {fantasia}, pessoa jurídica de direito \
             privado, inscrita no CNPJ sob o nº. {cnpj}, com sede na {sede}, Bairro {sede_bairro}, CEP: {sede_cep}, na \
             cidade {sede_cidade}, Estado de {estado}, autorizada pela Anatel para explorar o Serviço de Comunicação \
             Multimídia pelo {ato}, na modalidade avulsa ou conjunta, ora formalizam os benefícios concedidos, \
             mediante compromisso de fidelização.",
            name = s.name,
            rg = s.rg,
            cpf = s.cpf,
            address = s.address,
            city = s.city,
            uf = c.uf,
            cep = s.cep,
            bairro = s.bairro,
            estado = c.estado,
            razao = c.razao_social,
            fantasia = c.nome_fantasia,
            cnpj = c.cnpj,
            sede = c.endereco,
            sede_bairro = c.bairro,
            sede_cep = c.cep,
            sede_cidade = c.cidade,
            ato = c.ato_anatel,
        )),
        Block::Paragraph(
            "1. O ASSINANTE, ao contratar os serviços prestados pela PRESTADORA nas modalidades por ela ofertadas, \
             expressa sua aceitação e se compromete a permanecer como cliente da PRESTADORA pelo prazo de 12 (doze) \
             meses, a contar da data de contratação dos serviços, tendo em vista o recebimento dos benefícios descritos \
             neste instrumento."
                .into(),
        ),
        Block::Paragraph(
            "1.1 Os serviços ora adquiridos pelo ASSINANTE, seja na modalidade avulsa ou na conjunta, são ofertados com \
             preços mais vantajosos em relação aos valores integrais dos serviços, justamente em face da fidelidade aqui \
             pactuada, conforme consta do item abaixo transcrito."
                .into(),
        ),
        Block::Paragraph(
            "1.2 A PRESTADORA concedeu ao ASSINANTE os seguintes benefícios, válidos exclusivamente durante o prazo de \
             fidelidade contratual:"
                .into(),
        ),
        Block::Paragraph(format!(
            "Plano: {} Origem do desconto: Ativação Valor com fidelidade: {}",
            s.plan_name, s.plan_value
        )),
        Block::Paragraph(
            "1.3. Desta forma, na hipótese de rescisão contratual antes de findo o prazo de fidelidade, o ASSINANTE \
             pagará à PRESTADORA, a título de multa rescisória, a importância correspondente ao benefício que \
             efetivamente usufruiu, proporcionalmente aos meses restantes do contrato, cujo valor será corrigido pelo \
             IGP-M ou outro que eventualmente vier a substituí-lo."
                .into(),
        ),
        Block::Subtitle("TABELA MULTA RESCISÃO ANTECIPADA".into()),
        Block::Paragraph(format!("Desconto proporcional mensal Mensalidade: {}", format_brl(MONTHLY_BENEFIT))),
        Block::Paragraph(format!("Valor total dos benefícios concedidos: {}", format_brl(total_benefit))),
        Block::Lines(penalty_table()),
        Block::Paragraph(
            "2. Não obstante, o ASSINANTE não estará sujeito ao pagamento da multa apenas nas hipóteses abaixo elencadas:"
                .into(),
        ),
        Block::Paragraph(
            "a) houver superveniente incapacidade técnica da PRESTADORA para o cumprimento das condições técnicas e \
             funcionais dos serviços contratados, no mesmo endereço de instalação;"
                .into(),
        ),
        Block::Paragraph(
            "b) se o cancelamento for solicitado em razão de descumprimento de obrigação contratual ou legal por parte da \
             PRESTADORA."
                .into(),
        ),
        Block::Paragraph(
            "2.1. A adesão do ASSINANTE a outra oferta da PRESTADORA (promocional ou não), antes de decorridos 12 (doze) \
             meses da contratação, implicará em descumprimento da fidelidade ora avençada, ensejando, também, a \
             incidência da multa prevista neste Contrato de Permanência."
                .into(),
        ),
        Block::Paragraph(
            "3. Conforme delineado no Contrato de Prestação de Serviço de Comunicação Multimídia, Serviço de Valor \
             Adicionado, Locação e Outras Avenças, as promoções nunca excederão ao prazo máximo de 12 (doze) meses, \
             podendo viger por prazo inferior caso haja estipulação em contrário nos respectivos anúncios ou \
             lançamentos."
                .into(),
        ),
        Block::Paragraph(
            "4. O ASSINANTE declara estar ciente de que lhe é facultada a contratação avulsa e individual de qualquer \
             serviço ofertado pela PRESTADORA, sem a obrigatoriedade de adesão ao presente Termo, contudo sem os \
             benefícios que decorrem da fidelidade."
                .into(),
        ),
        Block::Paragraph(
            "5. Na hipótese de eventual período de suspensão dos serviços, por solicitação do ASSINANTE ou por \
             inadimplência, as obrigações contratuais das partes ficam prorrogadas pelo período da suspensão, assim \
             como a fluência do prazo de permanência fica igualmente suspensa, voltando a transcorrer após o retorno da \
             referida prestação."
                .into(),
        ),
        Block::Paragraph(
            "6. É de pleno conhecimento das partes que este instrumento é complementar e indissociável ao Contrato de \
             Prestação de Serviço de Comunicação Multimídia, Serviço de Valor Adicionado, Locação e Outras Avenças, e \
             ao respectivo Termo de Adesão."
                .into(),
        ),
        Block::Paragraph(
            "7. Fica, desde já, eleito o Foro do domicílio do Assinante como o competente para dirimir qualquer \
             conflito ou controvérsia oriunda deste Termo, em detrimento de quaisquer outros, por mais especiais ou \
             privilegiados que sejam."
                .into(),
        ),
        Block::Centered(vec![date_line]),
        signatures(c, s),
    ];
    (title, blocks)
}

fn rescisao(s: &Subscriber, c: &CompanyProfile, date_line: String) -> (String, Vec<Block>) {
    let title = "RESCISÃO DE CONTRATO".to_string();
    let motive_line = "_".repeat(87);

    let blocks = vec![
        Block::Title(title.clone()),
        Block::Paragraph(format!(
            "A empresa {razao}, inscrita no CNPJ nº {cnpj} e Inscrição Estadual nº {ie}, situada a {sede}, {bairro} de \
             {cidade} {uf}, representada pelo seu sócio {rep}, portador do CPF nº {rep_cpf}, informa que não prestará \
             mais serviços de fornecimento de Internet à {name}, portador(a) do CPF nº {cpf} e RG nº {rg} na cidade de \
             {city} a partir da data de ______________________",
            razao = c.razao_social,
            cnpj = c.cnpj,
            ie = c.inscricao_estadual,
            sede = c.endereco,
            bairro = c.bairro,
            cidade = c.cidade,
            uf = c.uf,
            rep = or_dash(c.representante_nome.as_deref()),
            rep_cpf = or_dash(c.representante_cpf.as_deref()),
            name = s.name,
            cpf = s.cpf,
            rg = s.rg,
            city = s.city,
        )),
        Block::Paragraph("MOTIVO DA RESCISÃO:".into()),
        Block::Lines(vec![motive_line.clone(), motive_line.clone(), motive_line]),
        Block::Centered(vec![SIGNATURE_LINE.to_string(), s.name.clone()]),
        Block::Centered(vec![SIGNATURE_LINE.to_string(), c.nome_fantasia.clone()]),
        Block::Centered(vec![date_line]),
    ];
    (title, blocks)
}
