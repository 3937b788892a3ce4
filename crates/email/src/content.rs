//! Shared email content templates
//!
//! Canonical content generators for the three one-time-password documents.
//! Pure functions of `(email, otp)`: no state, no I/O, no network.

/// Generate plain-text body for a sign-in one-time-password email.
pub fn sign_in_otp_text(email: &str, otp: &str) -> String {
    format!(
        "Your One-Time Password\n\n\
        A sign-in attempt requires further verification for {}.\n\n\
        To complete the sign-in, enter this code:\n\
        {}\n\n\
        This one-time password will expire in 10 minutes.\n\
        For your security, do not share this code with anyone.\n\n\
        If you did not attempt to sign in, please secure your account by changing your password immediately.",
        email, otp
    )
}

/// Generate styled HTML body for a sign-in one-time-password email.
pub fn sign_in_otp_html(email: &str, otp: &str) -> String {
    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; background-color: #ffffff; color: #333;">
                <div style="max-width: 600px; margin: 32px auto; padding: 32px; border: 1px solid #e5e7eb; border-radius: 12px;">
                    <h2 style="color: #1f2937; text-align: center;">Your One-Time Password</h2>

                    <p style="color: #4b5563; text-align: center;">
                        A sign-in attempt requires further verification for {email}
                    </p>

                    <div style="background-color: #f9fafb; border-radius: 8px; padding: 24px; margin: 16px 0;">
                        <p style="color: #4b5563; text-align: center; margin-bottom: 8px;">
                            To complete the sign-in, enter this code:
                        </p>
                        <p style="font-size: 36px; font-weight: bold; color: #7c3aed; text-align: center; letter-spacing: 4px; margin: 0;">
                            {otp}
                        </p>
                    </div>

                    <p style="color: #6b7280; font-size: 14px; text-align: center;">
                        This one-time password will expire in 10 minutes.
                    </p>
                    <p style="color: #6b7280; font-size: 14px; text-align: center;">
                        For your security, do not share this code with anyone.
                    </p>

                    <hr style="border: none; border-top: 1px solid #e5e7eb; margin: 16px 0;">

                    <p style="color: #9ca3af; font-size: 12px; text-align: center;">
                        If you did not attempt to sign in, please secure your account by changing your password immediately.
                    </p>
                </div>
            </body>
            </html>
            "#,
        email = email,
        otp = otp
    )
}

/// Generate plain-text body for an email-verification email.
pub fn verify_email_text(email: &str, otp: &str) -> String {
    format!(
        "Verify your Email Address\n\n\
        Please verify {}\n\
        Use the following code to verify your email address:\n\
        {}\n\n\
        This code is valid for 10 minutes\n\n\
        Thank you for joining us",
        email, otp
    )
}

/// Generate styled HTML body for an email-verification email.
pub fn verify_email_html(email: &str, otp: &str) -> String {
    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; color: #333;">
                <div style="max-width: 400px; margin: 32px auto; padding: 4px 24px; background-color: #f9fafb; border-radius: 16px; text-align: center;">
                    <p style="color: #8b5cf6; font-size: 12px; font-weight: 500;">
                        Verify your Email Address
                    </p>
                    <p style="color: #6b7280; margin: 0;">Please verify {email}</p>
                    <p style="color: #6b7280; margin: 0;">Use the following code to verify your email address</p>
                    <p style="font-size: 48px; font-weight: bold; padding-top: 8px; margin: 0;">{otp}</p>
                    <p style="color: #9ca3af; font-size: 12px; padding-bottom: 16px;">
                        This code is valid for 10 minutes
                    </p>
                    <p style="color: #4b5563; font-size: 12px;">Thank you for joining us</p>
                </div>
            </body>
            </html>
            "#,
        email = email,
        otp = otp
    )
}

/// Generate plain-text body for a password-reset email.
pub fn reset_password_text(email: &str, otp: &str) -> String {
    format!(
        "Password Reset Request\n\n\
        We received a request to reset the password for your account ({}).\n\n\
        To reset your password, enter this verification code:\n\
        {}\n\n\
        This verification code will expire in 10 minutes.\n\
        For your security, do not share this information with anyone.\n\n\
        If you did not request this password reset, please secure your account immediately by changing your password and enabling two-factor authentication.",
        email, otp
    )
}

/// Generate styled HTML body for a password-reset email.
pub fn reset_password_html(email: &str, otp: &str) -> String {
    format!(
        r#"
            <html>
            <body style="font-family: Arial, sans-serif; background-color: #ffffff; color: #333;">
                <div style="max-width: 600px; margin: 32px auto; padding: 32px; border: 1px solid #e5e7eb; border-radius: 12px;">
                    <h2 style="color: #1f2937; text-align: center;">Password Reset Request</h2>

                    <p style="color: #4b5563; text-align: center;">
                        We received a request to reset the password for your account ({email})
                    </p>

                    <div style="background-color: #f9fafb; border-radius: 8px; padding: 24px; margin: 16px 0;">
                        <p style="color: #4b5563; text-align: center; margin-bottom: 8px;">
                            To reset your password, enter this verification code:
                        </p>
                        <p style="font-size: 36px; font-weight: bold; color: #7c3aed; text-align: center; letter-spacing: 4px; margin: 0;">
                            {otp}
                        </p>
                    </div>

                    <p style="color: #6b7280; font-size: 14px; text-align: center;">
                        This verification code will expire in 10 minutes.
                    </p>
                    <p style="color: #6b7280; font-size: 14px; text-align: center;">
                        For your security, do not share this information with anyone.
                    </p>

                    <hr style="border: none; border-top: 1px solid #e5e7eb; margin: 16px 0;">

                    <p style="color: #9ca3af; font-size: 12px; text-align: center;">
                        If you did not request this password reset, please secure your account immediately by changing your password and enabling two-factor authentication.
                    </p>
                </div>
            </body>
            </html>
            "#,
        email = email,
        otp = otp
    )
}
