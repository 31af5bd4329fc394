mod jwt_auth;
