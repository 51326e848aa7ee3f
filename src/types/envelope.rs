use serde::Serialize;

/// Success envelope: `{success: true, ...fields}`.
#[derive(Serialize, Debug)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    result: T,
}

pub fn success<T: Serialize>(result: T) -> Success<T> {
    Success {
        success: true,
        result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Fields {
        title: &'static str,
    }

    #[test]
    fn fields_are_merged_after_success() {
        let value = serde_json::to_value(success(Fields { title: "T" })).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();

        assert_eq!(value, json!({"success": true, "title": "T"}));
        assert_eq!(keys, ["success", "title"]);
    }
}
