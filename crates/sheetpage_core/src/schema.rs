//! Named-column schema resolved against the sheet's header row.

use thiserror::Error;

const COLUMN_COUNT: usize = 22;

/// The logical columns the page template binds. Sheet headers are matched
/// against [`Column::header`] after [`normalize_header`] folding, so
/// editors can re-order, re-case or pad columns without breaking pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Slug,
    HeroImage,
    HeroTitle,
    HeroSubtitle,
    CtaLabel,
    CtaUrl,
    Intro,
    BenefitTitle,
    BenefitBody,
    BenefitsPacked,
    StepTitle,
    StepBody,
    StepsPacked,
    ForTitle,
    ForBody,
    ForPacked,
    NotForTitle,
    NotForBody,
    NotForPacked,
    FaqQuestion,
    FaqAnswer,
    FaqPacked,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Slug,
        Column::HeroImage,
        Column::HeroTitle,
        Column::HeroSubtitle,
        Column::CtaLabel,
        Column::CtaUrl,
        Column::Intro,
        Column::BenefitTitle,
        Column::BenefitBody,
        Column::BenefitsPacked,
        Column::StepTitle,
        Column::StepBody,
        Column::StepsPacked,
        Column::ForTitle,
        Column::ForBody,
        Column::ForPacked,
        Column::NotForTitle,
        Column::NotForBody,
        Column::NotForPacked,
        Column::FaqQuestion,
        Column::FaqAnswer,
        Column::FaqPacked,
    ];

    /// Canonical header cell for this column, already in normalized form.
    pub fn header(self) -> &'static str {
        match self {
            Column::Slug => "slug",
            Column::HeroImage => "hero image",
            Column::HeroTitle => "hero title",
            Column::HeroSubtitle => "hero subtitle",
            Column::CtaLabel => "cta label",
            Column::CtaUrl => "cta url",
            Column::Intro => "intro",
            Column::BenefitTitle => "benefit title",
            Column::BenefitBody => "benefit body",
            Column::BenefitsPacked => "benefits",
            Column::StepTitle => "step title",
            Column::StepBody => "step body",
            Column::StepsPacked => "how it works",
            Column::ForTitle => "for title",
            Column::ForBody => "for body",
            Column::ForPacked => "who it's for",
            Column::NotForTitle => "not for title",
            Column::NotForBody => "not for body",
            Column::NotForPacked => "who it's not for",
            Column::FaqQuestion => "faq question",
            Column::FaqAnswer => "faq answer",
            Column::FaqPacked => "faq",
        }
    }
}

/// The repeated-group sections of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Benefits,
    Steps,
    ForWhom,
    NotFor,
    Faq,
}

impl GroupKind {
    pub const ALL: [GroupKind; 5] = [
        GroupKind::Benefits,
        GroupKind::Steps,
        GroupKind::ForWhom,
        GroupKind::NotFor,
        GroupKind::Faq,
    ];

    /// Title column under the row-per-entry encoding.
    pub fn title_column(self) -> Column {
        match self {
            GroupKind::Benefits => Column::BenefitTitle,
            GroupKind::Steps => Column::StepTitle,
            GroupKind::ForWhom => Column::ForTitle,
            GroupKind::NotFor => Column::NotForTitle,
            GroupKind::Faq => Column::FaqQuestion,
        }
    }

    /// Body column under the row-per-entry encoding.
    pub fn body_column(self) -> Column {
        match self {
            GroupKind::Benefits => Column::BenefitBody,
            GroupKind::Steps => Column::StepBody,
            GroupKind::ForWhom => Column::ForBody,
            GroupKind::NotFor => Column::NotForBody,
            GroupKind::Faq => Column::FaqAnswer,
        }
    }

    /// Single-cell column under the packed encoding.
    pub fn packed_column(self) -> Column {
        match self {
            GroupKind::Benefits => Column::BenefitsPacked,
            GroupKind::Steps => Column::StepsPacked,
            GroupKind::ForWhom => Column::ForPacked,
            GroupKind::NotFor => Column::NotForPacked,
            GroupKind::Faq => Column::FaqPacked,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("sheet has no header row")]
    EmptyHeader,
    #[error("required column {header:?} is missing from the header row")]
    MissingColumn { header: &'static str },
}

/// Column indices resolved once from the header row. Extraction works
/// from these indices and never probes headers again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    indices: [Option<usize>; COLUMN_COUNT],
}

impl Schema {
    /// Resolve the header row. The slug and hero title columns are
    /// required; every other column is optional and its absence simply
    /// leaves the corresponding page section out. On duplicate headers
    /// the first occurrence wins.
    pub fn from_headers(headers: &[String]) -> Result<Self, SchemaError> {
        if headers.is_empty() {
            return Err(SchemaError::EmptyHeader);
        }
        let mut indices = [None; COLUMN_COUNT];
        for (idx, raw) in headers.iter().enumerate() {
            let name = normalize_header(raw);
            for column in Column::ALL {
                if column.header() == name && indices[column as usize].is_none() {
                    indices[column as usize] = Some(idx);
                }
            }
        }
        for required in [Column::Slug, Column::HeroTitle] {
            if indices[required as usize].is_none() {
                return Err(SchemaError::MissingColumn { header: required.header() });
            }
        }
        Ok(Self { indices })
    }

    /// Sheet column index for a logical column, if the header row has it.
    pub fn column(&self, column: Column) -> Option<usize> {
        self.indices[column as usize]
    }
}

/// Fold a raw header cell to canonical form: trimmed, lowercased, inner
/// whitespace runs collapsed to one space, typographic apostrophes
/// replaced with ASCII ones.
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_space = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
            continue;
        }
        prev_space = false;
        if ch == '\u{2019}' {
            out.push('\'');
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}
