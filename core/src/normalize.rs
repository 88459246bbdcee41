//! Upstream record to internal film.

use crate::types::{Film, FilmRecord};

/// Rename every field to the internal convention. `id` and `title` pass
/// through verbatim; an optional field that is missing or `""` becomes `None`.
pub fn normalize(record: FilmRecord) -> Film {
    Film {
        id: record.id,
        title: record.title,
        original_title: present(record.original_title),
        original_title_romanised: present(record.original_title_romanised),
        image: present(record.image),
        movie_banner: present(record.movie_banner),
        description: present(record.description),
        director: present(record.director),
        producer: present(record.producer),
        release_date: present(record.release_date),
        running_time: present(record.running_time),
        rt_score: present(record.rt_score),
    }
}

impl From<FilmRecord> for Film {
    fn from(record: FilmRecord) -> Self {
        normalize(record)
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
