pub mod film_list;
pub mod search_field;
