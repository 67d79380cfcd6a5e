pub const SINGLE_CTE: &str = "WITH a AS (SELECT abc FROM xxx) SELECT * FROM a";

pub const CHAINED_CTES: &str =
    "WITH a AS (SELECT 1 AS x), b AS (SELECT x FROM a) SELECT * FROM b";

pub const DATA_MODIFYING_CTES: &str = "WITH moved AS (DELETE FROM foo WHERE x > y RETURNING x, y), kept AS (SELECT x FROM moved) SELECT * FROM kept";

pub const NO_CTE: &str = "SELECT * FROM users WHERE id = 1";
