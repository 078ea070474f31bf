use super::ApiError;

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();
    if trimmed.len() < 2 {
        return Err(ApiError::validation(
            "Query parameter 'q' must be at least 2 characters",
        ));
    }
    Ok(trimmed)
}

pub fn validate_rating(rating: i32) -> Result<i32, ApiError> {
    if !(0..=5).contains(&rating) {
        return Err(ApiError::validation(format!(
            "Invalid rating: {rating}. Rating must be between 0 and 5"
        )));
    }
    Ok(rating)
}

pub fn validate_non_empty<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("Field '{field}' cannot be empty")));
    }
    Ok(trimmed)
}

pub fn validate_goal_target(target: i32) -> Result<i32, ApiError> {
    if target <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid target: {target}. Target must be a positive integer"
        )));
    }
    Ok(target)
}

pub fn validate_goal_year(year: i32) -> Result<i32, ApiError> {
    if !(1900..=2200).contains(&year) {
        return Err(ApiError::validation(format!(
            "Invalid year: {year}. Year must be between 1900 and 2200"
        )));
    }
    Ok(year)
}
