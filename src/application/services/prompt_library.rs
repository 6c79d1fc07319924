use crate::domain::ErrorKind;

const CONTENT_PLACEHOLDER: &str = "{content}";

const PREDEFINED: [(&str, &str); 10] = [
    (
        "Resumo",
        "Forneça um resumo detalhado e estruturado do seguinte documento. Inclua os pontos principais, conclusões e informações relevantes:\n\n{content}",
    ),
    (
        "Extrair Informações Principais",
        "Extraia as informações principais do documento abaixo. Liste os pontos mais importantes de forma organizada:\n\n{content}",
    ),
    (
        "Análise de Dados",
        "Analise o documento e extraia todos os dados numéricos, datas, métricas, valores financeiros e estatísticas importantes. Organize em uma lista estruturada:\n\n{content}",
    ),
    (
        "Perguntas e Respostas",
        "Leia cuidadosamente o documento e responda às seguintes perguntas de forma clara e objetiva:\n1. Qual é o assunto principal do documento?\n2. Quais são as conclusões apresentadas?\n3. Quais são as recomendações ou próximos passos?\n4. Quais são os pontos-chave que devem ser destacados?\n\nDocumento:\n{content}",
    ),
    (
        "Estrutura do Documento",
        "Identifique e descreva a estrutura do documento, incluindo:\n- Seções principais e subtópicos\n- Organização do conteúdo\n- Hierarquia de informações\n- Fluxo lógico do documento\n\nDocumento:\n{content}",
    ),
    (
        "Extrair Entidades",
        "Extraia do documento todas as entidades importantes, organizando-as por categoria:\n- Nomes de pessoas\n- Organizações e empresas\n- Locais e endereços\n- Datas e períodos\n- Valores monetários e números\n- Termos técnicos e conceitos-chave\n\nDocumento:\n{content}",
    ),
    (
        "Análise de Sentimento",
        "Analise o tom e sentimento do documento. Identifique:\n- Tom geral (positivo, neutro, negativo)\n- Linguagem utilizada\n- Pontos de destaque emocional\n- Recomendações ou críticas apresentadas\n\nDocumento:\n{content}",
    ),
    (
        "Extrair Ações e Tarefas",
        "Identifique e liste todas as ações, tarefas, responsabilidades e próximos passos mencionados no documento:\n\n{content}",
    ),
    (
        "Comparação e Contraste",
        "Se o documento contém comparações ou contrastes, identifique e descreva:\n- Elementos comparados\n- Diferenças e semelhanças\n- Conclusões das comparações\n\nDocumento:\n{content}",
    ),
    (
        "Resumo Executivo",
        "Crie um resumo executivo do documento, destacando:\n- Objetivo principal\n- Principais descobertas\n- Recomendações estratégicas\n- Impacto e implicações\n\nDocumento:\n{content}",
    ),
];

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("prompt '{name}' not found. Available prompts: {available}")]
    NotFound { name: String, available: String },
    #[error("template must contain {{content}} as the document placeholder")]
    MissingPlaceholder,
}

impl PromptError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Named prompt templates, predefined ones first in definition order.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    prompts: Vec<(String, String)>,
}

impl Default for PromptLibrary {
    fn default() -> Self {
        Self {
            prompts: PREDEFINED
                .iter()
                .map(|(name, template)| (name.to_string(), template.to_string()))
                .collect(),
        }
    }
}

impl PromptLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Result<&str, PromptError> {
        self.prompts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, template)| template.as_str())
            .ok_or_else(|| PromptError::NotFound {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.prompts.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Adds or replaces a template. It must contain `{content}`.
    pub fn add_custom(
        &mut self,
        name: impl Into<String>,
        template: impl Into<String>,
    ) -> Result<(), PromptError> {
        let name = name.into();
        let template = template.into();
        if !template.contains(CONTENT_PLACEHOLDER) {
            return Err(PromptError::MissingPlaceholder);
        }

        match self.prompts.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = template,
            None => self.prompts.push((name, template)),
        }
        Ok(())
    }

    /// Substitutes `{content}`, or appends the content under a label when the
    /// template has no placeholder.
    pub fn format(template: &str, content: &str) -> String {
        if template.contains(CONTENT_PLACEHOLDER) {
            template.replace(CONTENT_PLACEHOLDER, content)
        } else {
            format!("{template}\n\nDocumento:\n{content}")
        }
    }
}
