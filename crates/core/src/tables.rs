//! Resource kinds and their field tables
//!
//! Each kind differs from the others only by the data in this module: which
//! source keys feed which target field, how each field is formatted, and how it
//! is laid out on a card.

use serde::Serialize;

use crate::card::CardLayout;
use crate::mapper::{CodeTable, FieldRule, FieldTable};

/// Legislation act types (Portuguese labels)
pub static ACT_TYPES: CodeTable = CodeTable {
    name: "act_type",
    labels: &[
        ("lei", "Lei"),
        ("decreto", "Decreto"),
        ("portaria", "Portaria"),
        ("resolucao", "Resolução"),
        ("medida_provisoria", "Medida Provisória"),
        ("lei_complementar", "Lei Complementar"),
        ("instrucao_normativa", "Instrução Normativa"),
        ("emenda_constitucional", "Emenda Constitucional"),
        ("decreto_lei", "Decreto-Lei"),
        ("constituicao", "Constituição"),
        ("deliberacao", "Deliberação"),
        ("nota_tecnica", "Nota Técnica"),
    ],
};

pub static EVENT_TYPES: CodeTable = CodeTable {
    name: "event_type",
    labels: &[
        ("congress", "Congresso"),
        ("conference", "Conferência"),
        ("seminar", "Seminário"),
        ("symposium", "Simpósio"),
        ("workshop", "Oficina"),
        ("course", "Curso"),
        ("meeting", "Reunião"),
        ("webinar", "Webinar"),
        ("forum", "Fórum"),
    ],
};

pub static MEDIA_TYPES: CodeTable = CodeTable {
    name: "media_type",
    labels: &[
        ("video", "Vídeo"),
        ("audio", "Áudio"),
        ("image", "Imagem"),
        ("presentation", "Apresentação"),
        ("podcast", "Podcast"),
        ("infographic", "Infográfico"),
        ("document", "Documento"),
    ],
};

pub static JOURNAL_TABLE: FieldTable = FieldTable {
    fields: &[
        FieldRule::scalar("id", &["id", "django_id"]),
        FieldRule::scalar("title", &["title", "journal_title", "shortened_title"]),
        FieldRule::scalar("url", &["link", "url"]),
        FieldRule::scalar("description", &["description", "mission"]),
        FieldRule::scalar("issn", &["issn"]),
        FieldRule::scalar("publisher", &["responsibility_mention", "publisher"]),
        FieldRule::scalar("country", &["country", "publication_country"]).multilingual(),
        FieldRule::list("subject_area", &["subject_area", "descriptor"]).multilingual(),
        FieldRule::list("language", &["language"]).multilingual(),
        FieldRule::scalar("status", &["status"]),
        FieldRule::scalar("created_date", &["initial_date"]).date(),
    ],
    card: CardLayout {
        summary: Some("description"),
        content: &[
            ("ISSN", "issn"),
            ("Editora", "publisher"),
            ("País", "country"),
            ("Idioma", "language"),
        ],
        tags: &["subject_area"],
    },
};

pub static EVENT_TABLE: FieldTable = FieldTable {
    fields: &[
        FieldRule::scalar("id", &["id", "django_id"]),
        FieldRule::scalar("title", &["title"]),
        FieldRule::scalar("url", &["link", "url"]),
        FieldRule::scalar("description", &["description", "observations"]),
        FieldRule::scalar("start_date", &["start_date"]).date(),
        FieldRule::scalar("end_date", &["end_date"]).date(),
        FieldRule::scalar("location", &["city", "address", "location"]).multilingual(),
        FieldRule::scalar("country", &["country"]).multilingual(),
        FieldRule::scalar("event_type", &["event_type", "type"]).codes(&EVENT_TYPES),
        FieldRule::list("language", &["event_language", "language"]).multilingual(),
    ],
    card: CardLayout {
        summary: Some("description"),
        content: &[
            ("Tipo", "event_type"),
            ("Início", "start_date"),
            ("Término", "end_date"),
            ("Local", "location"),
            ("País", "country"),
        ],
        tags: &["language"],
    },
};

pub static WEB_RESOURCE_TABLE: FieldTable = FieldTable {
    fields: &[
        FieldRule::scalar("id", &["id", "django_id"]),
        FieldRule::scalar("title", &["title"]),
        FieldRule::scalar("url", &["link", "url"]),
        FieldRule::scalar("description", &["abstract", "description"]),
        FieldRule::scalar("author", &["author"]),
        FieldRule::scalar("originator", &["originator", "institution"]),
        FieldRule::scalar("country", &["country", "originator_location"]).multilingual(),
        FieldRule::list("language", &["source_language", "language"]).multilingual(),
        FieldRule::list(
            "subject_area",
            &["descriptor", "keywords", "thematic_area_display"],
        )
        .multilingual(),
        FieldRule::scalar("created_date", &["created_date"]).date(),
    ],
    card: CardLayout {
        summary: Some("description"),
        content: &[
            ("Autor", "author"),
            ("Instituição", "originator"),
            ("País", "country"),
            ("Idioma", "language"),
        ],
        tags: &["subject_area"],
    },
};

pub static LEGISLATION_TABLE: FieldTable = FieldTable {
    fields: &[
        FieldRule::scalar("id", &["id", "django_id"]),
        FieldRule::scalar("title", &["title", "reference_title"]),
        FieldRule::scalar("url", &["fulltext", "link", "url"]),
        FieldRule::scalar("description", &["abstract", "ementa", "description"]),
        FieldRule::scalar("act_type", &["act_type", "type"]).codes(&ACT_TYPES),
        FieldRule::scalar("act_number", &["act_number"]),
        FieldRule::scalar("issue_date", &["issue_date"]).date(),
        FieldRule::scalar("publication_date", &["publication_date"]).date(),
        FieldRule::scalar("institution", &["organ_issuer", "institution"]).multilingual(),
        FieldRule::scalar("country", &["scope_region", "country"]).multilingual(),
        FieldRule::list("language", &["language"]).multilingual(),
        FieldRule::list("subject_area", &["descriptor"]).multilingual(),
    ],
    card: CardLayout {
        summary: Some("description"),
        content: &[
            ("Tipo", "act_type"),
            ("Número", "act_number"),
            ("Data", "issue_date"),
            ("Órgão emissor", "institution"),
            ("País", "country"),
        ],
        tags: &["subject_area"],
    },
};

pub static MULTIMEDIA_TABLE: FieldTable = FieldTable {
    fields: &[
        FieldRule::scalar("id", &["id", "django_id"]),
        FieldRule::scalar("title", &["title", "title_translated"]),
        FieldRule::scalar("url", &["link", "url"]),
        FieldRule::scalar("description", &["description", "abstract"]),
        FieldRule::scalar("media_type", &["media_type", "type"]).codes(&MEDIA_TYPES),
        FieldRule::list("authors", &["authors", "contributors"]),
        FieldRule::scalar("publication_date", &["publication_date", "date"]).date(),
        FieldRule::scalar("duration", &["duration"]),
        FieldRule::scalar("thumbnail", &["thumbnail"]),
        FieldRule::scalar("country", &["publication_country", "country"]).multilingual(),
        FieldRule::list("language", &["language"]).multilingual(),
        FieldRule::list("subject_area", &["descriptor"]).multilingual(),
    ],
    card: CardLayout {
        summary: Some("description"),
        content: &[
            ("Tipo", "media_type"),
            ("Autores", "authors"),
            ("Data", "publication_date"),
            ("Duração", "duration"),
            ("País", "country"),
        ],
        tags: &["subject_area"],
    },
};

pub static DATABASE_TABLE: FieldTable = FieldTable {
    fields: &[
        FieldRule::scalar("id", &["id", "django_id"]),
        FieldRule::scalar("title", &["title", "name"]),
        FieldRule::scalar("url", &["link", "url"]),
        FieldRule::scalar("description", &["description"]),
        FieldRule::scalar("acronym", &["acronym"]),
        FieldRule::scalar("institution", &["institution", "responsible"]).multilingual(),
        FieldRule::scalar("country", &["country"]).multilingual(),
        FieldRule::scalar("coverage", &["coverage"]),
        FieldRule::list("subject_area", &["subject_area"]).multilingual(),
        FieldRule::list("language", &["language"]).multilingual(),
        FieldRule::scalar("update_frequency", &["update_frequency"]),
    ],
    card: CardLayout {
        summary: Some("description"),
        content: &[
            ("Sigla", "acronym"),
            ("Instituição", "institution"),
            ("Cobertura", "coverage"),
            ("País", "country"),
        ],
        tags: &["subject_area"],
    },
};

pub static GENERIC_TABLE: FieldTable = FieldTable {
    fields: &[
        FieldRule::scalar("id", &["id", "django_id"]),
        FieldRule::scalar("title", &["title", "name"]),
        FieldRule::scalar("url", &["link", "url"]),
        FieldRule::scalar("description", &["description", "abstract"]),
        FieldRule::scalar("country", &["country"]).multilingual(),
        FieldRule::list("language", &["language"]).multilingual(),
        FieldRule::list("subject_area", &["subject_area", "descriptor"]).multilingual(),
        FieldRule::scalar("date", &["date", "created_date"]).date(),
    ],
    card: CardLayout {
        summary: Some("description"),
        content: &[("Data", "date"), ("País", "country"), ("Idioma", "language")],
        tags: &["subject_area"],
    },
};

/// Kind of resource served by one upstream endpoint
#[derive(Debug, Serialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Journal,
    Event,
    WebResource,
    Legislation,
    Multimedia,
    BibliographicDatabase,
    /// Arbitrary-named resource list configured by the site
    Generic(String),
}

impl ResourceKind {
    /// Kinds with a dedicated field table
    pub const BUILTIN: [ResourceKind; 6] = [
        ResourceKind::Journal,
        ResourceKind::Event,
        ResourceKind::WebResource,
        ResourceKind::Legislation,
        ResourceKind::Multimedia,
        ResourceKind::BibliographicDatabase,
    ];

    /// Key of this kind in the settings store
    pub fn settings_key(&self) -> &str {
        match self {
            ResourceKind::Journal => "journals",
            ResourceKind::Event => "events",
            ResourceKind::WebResource => "web-resources",
            ResourceKind::Legislation => "legislations",
            ResourceKind::Multimedia => "multimedia",
            ResourceKind::BibliographicDatabase => "bibliographic-databases",
            ResourceKind::Generic(name) => name,
        }
    }

    /// Inverse of [`ResourceKind::settings_key`]; unknown keys are generic resources
    pub fn from_settings_key(key: &str) -> Self {
        Self::BUILTIN
            .into_iter()
            .find(|kind| kind.settings_key() == key)
            .unwrap_or_else(|| ResourceKind::Generic(key.to_string()))
    }

    pub fn field_table(&self) -> &'static FieldTable {
        match self {
            ResourceKind::Journal => &JOURNAL_TABLE,
            ResourceKind::Event => &EVENT_TABLE,
            ResourceKind::WebResource => &WEB_RESOURCE_TABLE,
            ResourceKind::Legislation => &LEGISLATION_TABLE,
            ResourceKind::Multimedia => &MULTIMEDIA_TABLE,
            ResourceKind::BibliographicDatabase => &DATABASE_TABLE,
            ResourceKind::Generic(_) => &GENERIC_TABLE,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.settings_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::Shape;

    fn all_tables() -> Vec<&'static FieldTable> {
        let mut tables: Vec<_> = ResourceKind::BUILTIN.iter().map(|k| k.field_table()).collect();
        tables.push(&GENERIC_TABLE);
        tables
    }

    #[test]
    fn test_settings_key_round_trip() {
        for kind in ResourceKind::BUILTIN {
            assert_eq!(ResourceKind::from_settings_key(kind.settings_key()), kind);
        }
        assert_eq!(
            ResourceKind::from_settings_key("clinical-guides"),
            ResourceKind::Generic("clinical-guides".to_string())
        );
    }

    #[test]
    fn test_every_table_has_identity_fields() {
        for table in all_tables() {
            for name in ["id", "title", "url", "description"] {
                let rule = table.rule(name).unwrap_or_else(|| panic!("missing {name}"));
                assert_eq!(rule.shape, Shape::Scalar);
            }
        }
    }

    #[test]
    fn test_card_layouts_reference_known_fields() {
        for table in all_tables() {
            let mut names: Vec<&str> = table.card.content.iter().map(|(_, f)| *f).collect();
            names.extend(table.card.tags);
            names.extend(table.card.summary);
            for name in names {
                assert!(table.rule(name).is_some(), "unknown card field {name}");
            }
        }
    }

    #[test]
    fn test_field_names_are_unique() {
        for table in all_tables() {
            let mut names: Vec<_> = table.fields.iter().map(|r| r.name).collect();
            let before = names.len();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), before);
        }
    }

    #[test]
    fn test_code_tables_are_lowercase() {
        for table in [&ACT_TYPES, &EVENT_TYPES, &MEDIA_TYPES] {
            for (code, _) in table.labels {
                assert_eq!(*code, code.to_lowercase(), "{} code {code}", table.name);
            }
        }
    }

    #[test]
    fn test_open_question_accessors_exist() {
        assert!(EVENT_TABLE.rule("event_type").is_some());
        assert!(EVENT_TABLE.rule("location").is_some());
        assert!(LEGISLATION_TABLE.rule("act_type").is_some());
        assert!(LEGISLATION_TABLE.rule("institution").is_some());
        assert!(MULTIMEDIA_TABLE.rule("duration").is_some());
    }
}
