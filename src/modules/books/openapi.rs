use serde_json::{json, Value};

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": "#/components/schemas/ErrorResponse" }))
    })
}

fn book_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": "#/components/schemas/Book" }))
    })
}

fn id_parameter() -> Value {
    json!({
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Book identifier",
        "schema": { "type": "string" }
    })
}

fn input_body() -> Value {
    json!({
        "required": true,
        "content": json_content(json!({ "$ref": "#/components/schemas/BookInput" }))
    })
}

/// OpenAPI fragment for the books module, paths relative to `/api/books`
pub fn spec() -> Value {
    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books, most recently created first",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "List of books",
                            "content": json_content(json!({
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }))
                        },
                        "500": error_response("Internal server error")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": input_body(),
                    "responses": {
                        "201": book_response("Stored book"),
                        "400": error_response("Validation failed; `errors` lists every violation"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": book_response("The book"),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                },
                "put": {
                    "summary": "Replace every mutable field of a book",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "requestBody": input_body(),
                    "responses": {
                        "200": book_response("Updated book"),
                        "400": error_response("Validation failed; `errors` lists every violation"),
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                },
                "delete": {
                    "summary": "Delete a book permanently",
                    "tags": ["Books"],
                    "parameters": [id_parameter()],
                    "responses": {
                        "200": {
                            "description": "Deletion confirmation",
                            "content": json_content(json!({
                                "type": "object",
                                "properties": { "message": { "type": "string" } },
                                "required": ["message"]
                            }))
                        },
                        "404": error_response("Book not found"),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "text/plain": { "schema": { "type": "string" } }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "BookStatus": {
                    "type": "string",
                    "enum": ["UNREAD", "READING", "COMPLETED", "ABANDONED"]
                },
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Unique identifier for the book" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "genre": { "type": ["string", "null"] },
                        "status": {
                            "oneOf": [
                                { "$ref": "#/components/schemas/BookStatus" },
                                { "type": "null" }
                            ]
                        },
                        "rating": { "type": ["integer", "null"], "minimum": 1, "maximum": 5 },
                        "notes": { "type": ["string", "null"] },
                        "createdAt": { "type": "string", "format": "date-time" },
                        "updatedAt": { "type": "string", "format": "date-time" }
                    },
                    "required": [
                        "id", "title", "author", "genre", "status",
                        "rating", "notes", "createdAt", "updatedAt"
                    ]
                },
                "BookInput": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string", "minLength": 1 },
                        "author": { "type": "string", "minLength": 1 },
                        "genre": { "type": ["string", "null"] },
                        "status": {
                            "oneOf": [
                                { "$ref": "#/components/schemas/BookStatus" },
                                { "type": "null" }
                            ]
                        },
                        "rating": { "type": ["integer", "null"], "minimum": 1, "maximum": 5 },
                        "notes": { "type": ["string", "null"] }
                    },
                    "required": ["title", "author"]
                },
                "Violation": {
                    "type": "object",
                    "properties": {
                        "kind": {
                            "type": "string",
                            "enum": ["missing_field", "invalid_enum", "out_of_range", "type_mismatch"]
                        },
                        "field": { "type": "string" },
                        "message": { "type": "string" }
                    },
                    "required": ["kind", "field", "message"]
                }
            }
        }
    })
}
